//! Package lookups against the ament index layout

use std::path::{Path, PathBuf};

const FALLBACK_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// Find the install prefix that contains `share/<package>`
pub fn find_package_prefix(package: &str) -> Option<PathBuf> {
    if let Ok(prefix_path) = std::env::var("AMENT_PREFIX_PATH") {
        if let Some(prefix) = search_prefixes(prefix_path.split(':'), package) {
            return Some(prefix);
        }
    }

    let distro = std::env::var("ROS_DISTRO").ok();
    let distro_prefixes = distro
        .iter()
        .map(String::as_str)
        .chain(FALLBACK_DISTROS.iter().copied())
        .map(|d| format!("/opt/ros/{}", d))
        .collect::<Vec<_>>();

    search_prefixes(distro_prefixes.iter().map(String::as_str), package)
}

/// Find the share directory of a package
pub fn find_package_share(package: &str) -> Option<PathBuf> {
    find_package_prefix(package).map(|prefix| prefix.join("share").join(package))
}

fn search_prefixes<'a>(
    prefixes: impl IntoIterator<Item = &'a str>,
    package: &str,
) -> Option<PathBuf> {
    prefixes
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(Path::new)
        .find(|prefix| prefix.join("share").join(package).is_dir())
        .map(Path::to_path_buf)
}
