//! Launch context for template variables and package lookups

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Variables and share-directory overrides visible while resolving templates
#[derive(Debug, Clone, Default)]
pub struct LaunchContext {
    configurations: HashMap<String, String>,
    package_shares: HashMap<String, PathBuf>,
}

impl LaunchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_configuration(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.configurations.insert(name.into(), value.into());
    }

    pub fn get_configuration(&self, name: &str) -> Option<String> {
        self.configurations.get(name).cloned()
    }

    pub fn configurations(&self) -> &HashMap<String, String> {
        &self.configurations
    }

    /// Pin the share directory of a package, bypassing the ament index
    pub fn set_package_share(&mut self, package: impl Into<String>, path: impl Into<PathBuf>) {
        self.package_shares.insert(package.into(), path.into());
    }

    pub fn package_share(&self, package: &str) -> Option<&Path> {
        self.package_shares.get(package).map(PathBuf::as_path)
    }

    /// Child context for one participant. Variables set on the child do not
    /// leak back into the parent.
    pub fn scoped(&self) -> Self {
        self.clone()
    }
}
