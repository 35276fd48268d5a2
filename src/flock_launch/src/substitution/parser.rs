//! Substitution parser

use crate::{error::SubstitutionError, substitution::types::Substitution};
use lru::LruCache;
use std::{cell::RefCell, num::NonZeroUsize};

// Caches parsed templates, never resolved values. Parsing does not depend on
// the context, so the same input always yields the same substitution list.
const SUBSTITUTION_CACHE_SIZE: usize = 256;

thread_local! {
    static PARSE_CACHE: RefCell<LruCache<String, Vec<Substitution>>> = RefCell::new(
        LruCache::new(NonZeroUsize::new(SUBSTITUTION_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN)),
    );
}

/// Parse a template like "base_link$(var suffix)" or "$(find-pkg-share pkg)/urdf"
pub fn parse_substitutions(input: &str) -> Result<Vec<Substitution>, SubstitutionError> {
    let cached = PARSE_CACHE.with(|cache| cache.borrow_mut().get(input).cloned());
    if let Some(subs) = cached {
        log::trace!("Substitution parse cache hit: {}", input);
        return Ok(subs);
    }

    log::trace!("Substitution parse cache miss: {}", input);
    let result = parse_uncached(input)?;
    PARSE_CACHE.with(|cache| {
        cache.borrow_mut().put(input.to_string(), result.clone());
    });
    Ok(result)
}

fn parse_uncached(input: &str) -> Result<Vec<Substitution>, SubstitutionError> {
    let mut result = Vec::new();
    let mut chars = input.char_indices().peekable();
    let mut last_pos = 0;

    while let Some((i, ch)) = chars.next() {
        if ch != '$' || !matches!(chars.peek(), Some((_, '('))) {
            continue;
        }

        if i > last_pos {
            result.push(Substitution::Text(input[last_pos..i].to_string()));
        }

        // Skip the '('
        chars.next();

        let sub_start = i + 2;
        let mut depth = 1;
        let mut sub_end = None;

        for (pos, c) in chars.by_ref() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        sub_end = Some(pos);
                        break;
                    }
                }
                _ => {}
            }
        }

        let sub_end = sub_end.ok_or_else(|| {
            SubstitutionError::InvalidSubstitution(format!(
                "Unmatched parentheses in '{}'",
                input
            ))
        })?;

        result.push(parse_substitution_content(&input[sub_start..sub_end])?);
        last_pos = sub_end + 1;
    }

    if last_pos < input.len() {
        result.push(Substitution::Text(input[last_pos..].to_string()));
    }

    if result.is_empty() {
        result.push(Substitution::Text(String::new()));
    }

    Ok(result)
}

/// Parse the inside of "$(...)"
fn parse_substitution_content(content: &str) -> Result<Substitution, SubstitutionError> {
    if content.contains("$(") {
        return Err(SubstitutionError::InvalidSubstitution(format!(
            "Nested substitutions are not supported: $({})",
            content
        )));
    }

    let mut parts = content.split_whitespace();
    let kind = parts.next().ok_or_else(|| {
        SubstitutionError::InvalidSubstitution("Empty substitution $()".to_string())
    })?;
    let args: Vec<&str> = parts.collect();

    match (kind, args.as_slice()) {
        ("var", [name]) => Ok(Substitution::LaunchConfiguration(name.to_string())),
        ("env", [name]) => Ok(Substitution::EnvironmentVariable {
            name: name.to_string(),
            default: None,
        }),
        ("env", [name, default]) => Ok(Substitution::EnvironmentVariable {
            name: name.to_string(),
            default: Some(strip_quotes(default).to_string()),
        }),
        ("find-pkg-share", [package]) => Ok(Substitution::FindPackageShare(package.to_string())),
        ("var" | "env" | "find-pkg-share", _) => Err(SubstitutionError::InvalidSubstitution(
            format!("Wrong number of arguments in $({})", content),
        )),
        (other, _) => Err(SubstitutionError::InvalidSubstitution(format!(
            "Unknown substitution type '{}'",
            other
        ))),
    }
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
        .unwrap_or(s)
}
