//! Acquisition error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading or extracting a resource.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("invalid destination (exists with wrong type): {}", .0.display())]
    InvalidDestination(PathBuf),

    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("cannot generate a file name: no file given and no seed data")]
    HashGeneration,

    #[error("archive error in {}: {reason}", path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("archive entry escapes destination: {entry}")]
    UnsafeEntry { entry: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Destination conflicts and format problems need the caller to change
    /// something first; transfer and filesystem hiccups may clear up.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
