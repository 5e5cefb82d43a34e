//! Filesystem utilities

use std::path::Path;

use log::warn;

/// Check that a path points at a regular file, logging a warning when it does not
pub fn is_file(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_file() {
        return true;
    }

    if path.exists() {
        warn!("{} exists but is not a file", path.display());
    } else {
        warn!("{} does not exist", path.display());
    }
    false
}
