use std::env;
use std::path::{Path, PathBuf};

use super::LaunchError;

pub const AMENT_PREFIX_PATH: &str = "AMENT_PREFIX_PATH";

/// Locate `<prefix>/share/<package>` on the ament prefix path.
pub fn package_share_directory(package: &str) -> Result<PathBuf, LaunchError> {
    let search_path = env::var_os(AMENT_PREFIX_PATH).unwrap_or_default();
    let prefixes: Vec<PathBuf> = env::split_paths(&search_path).collect();
    find_share_directory(package, &prefixes)
}

/// Search `prefixes` in order; the first one that installs `package` wins.
pub fn find_share_directory(package: &str, prefixes: &[PathBuf]) -> Result<PathBuf, LaunchError> {
    prefixes
        .iter()
        .filter(|prefix| !prefix.as_os_str().is_empty())
        .map(|prefix| share_dir_under(prefix, package))
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| LaunchError::PackageNotFound {
            package: package.to_string(),
            searched: prefixes.to_vec(),
        })
}

fn share_dir_under(prefix: &Path, package: &str) -> PathBuf {
    prefix.join("share").join(package)
}
