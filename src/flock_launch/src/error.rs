//! Error types for flock_launch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstitutionError {
    #[error("Undefined variable: '{0}'")]
    UndefinedVariable(String),

    #[error(
        "Undefined environment variable: '{0}'. Make sure the variable is set in your environment."
    )]
    UndefinedEnvVar(String),

    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),

    #[error("Invalid substitution: {0}")]
    InvalidSubstitution(String),
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to resolve '{template}' for {scope}: {source}")]
    Template {
        template: String,
        scope: String,
        #[source]
        source: SubstitutionError,
    },
}

pub type Result<T> = std::result::Result<T, PlanError>;
