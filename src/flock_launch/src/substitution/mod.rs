//! Template substitution for per-participant values

pub mod context;
pub mod parser;
pub mod types;

pub use context::LaunchContext;
pub use parser::parse_substitutions;
pub use types::{resolve_substitutions, Substitution};

use crate::error::SubstitutionError;

/// Parse and resolve a template in one step
pub fn resolve_template(
    template: &str,
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let subs = parse_substitutions(template)?;
    resolve_substitutions(&subs, context)
}
