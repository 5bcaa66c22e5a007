//! Common filesystem utilities
//!
//! Provides shared filesystem operations used by the downloader and extractor.

use crate::core::error::{FetchError, Result};
use std::path::{Component, Path, PathBuf};

/// Ensure a file's parent directory exists.
///
/// Creates the parent directory (and all ancestors) if it doesn't exist.
///
/// # Example
/// ```ignore
/// ensure_parent_dir(Path::new("/foo/bar/baz.zip"))?;
/// // /foo/bar/ now exists
/// ```
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| FetchError::io(parent, e))?;
    }
    Ok(())
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths that do not start with `~`, or systems without a home directory,
/// are returned unchanged.
pub fn expand_user(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Make a path absolute against the current directory, without touching the
/// filesystem otherwise.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| FetchError::io(path, e))
}

/// Size of a regular file, or `None` if the path is missing or not a file.
pub fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|md| md.is_file())
        .map(|md| md.len())
}

/// Check if path is safe (no path traversal).
///
/// Rejects absolute paths and paths containing "..".
pub fn is_safe_path(path: &Path) -> bool {
    !path.is_absolute() && !path.components().any(|c| c == Component::ParentDir)
}
