//! Cache path resolution. The local path is the cache key.

use crate::core::error::{FetchError, Result};
use crate::internal::fs_utils;
use md5::{Digest, Md5};
use std::path::{Path, PathBuf};

/// Extension given to content-addressed downloads.
pub const CACHE_EXTENSION: &str = "download";

/// Content-addressed file name for `seed`: `<md5 hex>.download`.
pub fn content_addressed_name(seed: &[u8]) -> String {
    let digest = Md5::digest(seed);
    format!("{}.{}", hex::encode(digest), CACHE_EXTENSION)
}

/// Compute the download path without touching the filesystem.
///
/// `file` is taken relative to `dir` (or used as-is when absolute); `dir`
/// defaults to the current directory. A leading `~` in `dir` is expanded.
pub fn download_path(dir: Option<&Path>, file: Option<&Path>, seed: Option<&[u8]>) -> Result<PathBuf> {
    let file = match (file, seed) {
        (Some(file), _) => file.to_path_buf(),
        (None, Some(seed)) => PathBuf::from(content_addressed_name(seed)),
        (None, None) => return Err(FetchError::HashGeneration),
    };

    let joined = match dir {
        Some(dir) => fs_utils::expand_user(dir).join(file),
        None => file,
    };

    fs_utils::absolute(&joined)
}

/// Fail with `InvalidDestination` if `path` exists but is not a regular file.
pub fn validate_destination(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(md) if !md.is_file() => Err(FetchError::InvalidDestination(path.to_path_buf())),
        _ => Ok(()),
    }
}

/// Resolve the absolute local path for a download.
///
/// # Example
/// ```no_run
/// use simfetch::acquire::paths::resolve_path;
///
/// let a = resolve_path(None, None, Some(b"https://example.com/grid.zip")).unwrap();
/// let b = resolve_path(None, None, Some(b"https://example.com/grid.zip")).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn resolve_path(dir: Option<&Path>, file: Option<&Path>, seed: Option<&[u8]>) -> Result<PathBuf> {
    let path = download_path(dir, file, seed)?;
    validate_destination(&path)?;
    Ok(path)
}
