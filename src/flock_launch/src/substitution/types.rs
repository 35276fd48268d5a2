//! Substitution types

use crate::ament;
use crate::error::SubstitutionError;
use crate::substitution::context::LaunchContext;

/// One piece of a templated value
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// Plain text (no substitution)
    Text(String),
    /// $(var name) - Launch configuration variable
    LaunchConfiguration(String),
    /// $(env VAR [default]) - Environment variable with optional default
    EnvironmentVariable {
        name: String,
        default: Option<String>,
    },
    /// $(find-pkg-share package_name) - Package share directory
    FindPackageShare(String),
}

impl Substitution {
    /// Resolve substitution to string value
    pub fn resolve(&self, context: &LaunchContext) -> Result<String, SubstitutionError> {
        match self {
            Substitution::Text(s) => Ok(s.clone()),
            Substitution::LaunchConfiguration(name) => context
                .get_configuration(name)
                .ok_or_else(|| SubstitutionError::UndefinedVariable(name.clone())),
            Substitution::EnvironmentVariable { name, default } => {
                std::env::var(name).or_else(|_| {
                    default
                        .clone()
                        .ok_or_else(|| SubstitutionError::UndefinedEnvVar(name.clone()))
                })
            }
            Substitution::FindPackageShare(package) => {
                if let Some(share) = context.package_share(package) {
                    return Ok(share.display().to_string());
                }
                ament::find_package_share(package)
                    .map(|p| p.display().to_string())
                    .ok_or_else(|| SubstitutionError::PackageNotFound(package.clone()))
            }
        }
    }
}

/// Resolve list of substitutions to single string
pub fn resolve_substitutions(
    subs: &[Substitution],
    context: &LaunchContext,
) -> Result<String, SubstitutionError> {
    let mut result = String::new();
    for sub in subs {
        result.push_str(&sub.resolve(context)?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_substitution() {
        let sub = Substitution::Text("hello".to_string());
        let context = LaunchContext::new();
        assert_eq!(sub.resolve(&context).unwrap(), "hello");
    }

    #[test]
    fn test_launch_configuration() {
        let sub = Substitution::LaunchConfiguration("suffix".to_string());
        let mut context = LaunchContext::new();
        context.set_configuration("suffix", "_2");
        assert_eq!(sub.resolve(&context).unwrap(), "_2");
    }

    #[test]
    fn test_undefined_variable() {
        let sub = Substitution::LaunchConfiguration("undefined".to_string());
        let context = LaunchContext::new();
        assert_eq!(
            sub.resolve(&context),
            Err(SubstitutionError::UndefinedVariable("undefined".to_string()))
        );
    }

    #[test]
    fn test_env_var() {
        std::env::set_var("FLOCK_LAUNCH_TEST_VAR", "test_value");
        let sub = Substitution::EnvironmentVariable {
            name: "FLOCK_LAUNCH_TEST_VAR".to_string(),
            default: None,
        };
        let context = LaunchContext::new();
        assert_eq!(sub.resolve(&context).unwrap(), "test_value");
    }

    #[test]
    fn test_env_var_with_default() {
        let sub = Substitution::EnvironmentVariable {
            name: "FLOCK_LAUNCH_NONEXISTENT_VAR".to_string(),
            default: Some("default_value".to_string()),
        };
        let context = LaunchContext::new();
        assert_eq!(sub.resolve(&context).unwrap(), "default_value");
    }

    #[test]
    fn test_find_package_share_override() {
        let mut context = LaunchContext::new();
        context.set_package_share("tello_description", "/ws/share/tello_description");
        let sub = Substitution::FindPackageShare("tello_description".to_string());
        assert_eq!(sub.resolve(&context).unwrap(), "/ws/share/tello_description");
    }

    #[test]
    fn test_find_package_share_missing() {
        let sub = Substitution::FindPackageShare("flock_launch_no_such_package".to_string());
        let context = LaunchContext::new();
        assert_eq!(
            sub.resolve(&context),
            Err(SubstitutionError::PackageNotFound(
                "flock_launch_no_such_package".to_string()
            ))
        );
    }

    #[test]
    fn test_resolve_multiple() {
        let subs = vec![
            Substitution::Text("base_link".to_string()),
            Substitution::LaunchConfiguration("suffix".to_string()),
        ];
        let mut context = LaunchContext::new();
        context.set_configuration("suffix", "_1");
        assert_eq!(resolve_substitutions(&subs, &context).unwrap(), "base_link_1");
    }
}
