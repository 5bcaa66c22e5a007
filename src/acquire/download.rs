//! Cached file downloads
//!
//! The cache check compares sizes only. A remote file that changes content
//! but keeps its length is treated as unchanged.

use super::http::Transport;
use super::paths;
use crate::core::error::{FetchError, Result};
use crate::core::reporter::Reporter;
use crate::internal::fs_utils;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Where and how to store a download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// File name (relative to `dir`, or absolute). Falls back to the server's
    /// suggested name, then to a name derived from the URL.
    pub file: Option<PathBuf>,
    /// Directory for the file. Defaults to the current directory.
    pub dir: Option<PathBuf>,
    /// Re-download even when the cached copy looks current.
    pub overwrite: bool,
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Outcome of comparing a local file against the remote size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDecision {
    /// Local copy has the remote size; reuse it.
    Hit,
    /// Nothing usable on disk.
    Missing,
    /// Local copy exists but its size differs.
    SizeChanged { local: u64, remote: u64 },
    /// Caller asked for a fresh copy.
    Forced,
}

impl CacheDecision {
    /// Decide from the local file size (`None` if absent) and the remote size.
    pub fn decide(local_size: Option<u64>, remote_size: u64, overwrite: bool) -> Self {
        match local_size {
            None => Self::Missing,
            Some(_) if overwrite => Self::Forced,
            Some(local) if local == remote_size => Self::Hit,
            Some(local) => Self::SizeChanged {
                local,
                remote: remote_size,
            },
        }
    }
}

/// Download `url` according to `options` and return the absolute local path.
pub fn download(
    transport: &dyn Transport,
    reporter: &dyn Reporter,
    url: &str,
    options: &DownloadOptions,
) -> Result<PathBuf> {
    let remote = transport.probe(url)?;
    if !remote.is_ok() {
        return Err(FetchError::network(url, format!("HTTP {}", remote.status)));
    }

    let file = match (&options.file, &remote.suggested_name) {
        (Some(file), _) => Some(file.clone()),
        (None, Some(name)) => Some(PathBuf::from(name)),
        (None, None) => None,
    };
    let dest = paths::resolve_path(options.dir.as_deref(), file.as_deref(), Some(url.as_bytes()))?;

    let decision = CacheDecision::decide(fs_utils::file_size(&dest), remote.size, options.overwrite);
    match decision {
        CacheDecision::Hit => {
            reporter.debug(&format!("skip downloading existing file {}", dest.display()));
            return Ok(dest);
        }
        CacheDecision::Forced => {
            reporter.debug(&format!("forced re-download of {}", dest.display()));
        }
        CacheDecision::SizeChanged { local, remote } => {
            reporter.debug(&format!(
                "re-downloading {}: size changed from {} to {} bytes",
                dest.display(),
                local,
                remote
            ));
        }
        CacheDecision::Missing => {
            reporter.debug(&format!("downloading {} to {}", url, dest.display()));
        }
    }

    fs_utils::ensure_parent_dir(&dest)?;
    let temp = transfer_to_temp(transport, reporter, url, &dest)?;

    let size = temp
        .as_file()
        .metadata()
        .map_err(|e| FetchError::io(temp.path(), e))?
        .len();
    if size == 0 {
        reporter.warning(&format!("downloaded an empty file from {}", url));
    }

    publish(temp, &dest)?;
    reporter.debug(&format!("downloaded {} ({} bytes)", dest.display(), size));

    Ok(dest)
}

/// Stream the body into a temporary file beside `dest`, so the final rename
/// stays on one volume. The file is removed if the transfer fails.
fn transfer_to_temp(
    transport: &dyn Transport,
    reporter: &dyn Reporter,
    url: &str,
    dest: &Path,
) -> Result<tempfile::NamedTempFile> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    let mut temp = tempfile::Builder::new()
        .prefix(".simfetch-")
        .suffix(".part")
        .tempfile_in(parent)
        .map_err(|e| FetchError::io(parent, e))?;

    let label = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| url.to_string());

    let mut body = transport.open(url)?;
    reporter.transfer_started(&label, body.content_length);

    let result = copy_with_progress(&mut body.reader, temp.as_file_mut(), |written| {
        reporter.transfer_progress(written, body.content_length);
    });
    reporter.transfer_finished();

    result.map_err(|e| match e {
        CopyError::Read(e) => FetchError::network(url, e),
        CopyError::Write(e) => FetchError::io(temp.path(), e),
    })?;

    temp.as_file_mut()
        .sync_all()
        .map_err(|e| FetchError::io(temp.path(), e))?;
    Ok(temp)
}

/// Rename the finished temporary file over `dest`.
fn publish(temp: tempfile::NamedTempFile, dest: &Path) -> Result<()> {
    temp.persist(dest)
        .map_err(|e| FetchError::io(dest, e.error))?;
    Ok(())
}

enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

fn copy_with_progress(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    mut on_progress: impl FnMut(u64),
) -> std::result::Result<u64, CopyError> {
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(CopyError::Write)?;

        total_bytes += bytes_read as u64;
        on_progress(total_bytes);
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total_bytes)
}
