//! Archive extraction
//!
//! Entries are written to a staging directory and renamed into place, so a
//! failed extraction leaves no destination behind. A single top-level folder
//! named after the archive (`foo.zip` containing `foo/...`) is collapsed.

use crate::core::error::{FetchError, Result};
use crate::core::reporter::Reporter;
use crate::internal::fs_utils;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Extension of the supported archive format.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Whether `path` names a supported archive.
pub fn is_supported_archive(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// Default extraction directory: the archive path without its extension.
pub fn default_extract_dir(archive: &Path) -> PathBuf {
    archive.with_extension("")
}

/// Extract `archive` and return the directory holding its contents.
///
/// `dst_dir` defaults to the archive path without extension. If it already
/// exists as a directory it is returned untouched when `skip_if_exists` is
/// true, and rejected with `AlreadyExists` otherwise.
///
/// # Example
/// ```no_run
/// use simfetch::{extract, SilentReporter};
/// use std::path::Path;
///
/// let dir = extract(Path::new("/data/grid.zip"), None, true, &SilentReporter).unwrap();
/// println!("csv files in {}", dir.display());
/// ```
pub fn extract(
    archive: &Path,
    dst_dir: Option<&Path>,
    skip_if_exists: bool,
    reporter: &dyn Reporter,
) -> Result<PathBuf> {
    if !is_supported_archive(archive) {
        return Err(FetchError::UnsupportedFormat(archive.to_path_buf()));
    }

    let archive = fs_utils::absolute(archive)?;
    let dst_dir = match dst_dir {
        Some(dir) => fs_utils::absolute(dir)?,
        None => default_extract_dir(&archive),
    };
    let stem = archive.file_stem().unwrap_or_default().to_os_string();

    match std::fs::metadata(&dst_dir) {
        Ok(md) if !md.is_dir() => return Err(FetchError::InvalidDestination(dst_dir)),
        Ok(_) if skip_if_exists => {
            reporter.debug(&format!(
                "skip extraction, destination exists: {}",
                dst_dir.display()
            ));
            return Ok(effective_root(&dst_dir, &stem));
        }
        Ok(_) => return Err(FetchError::AlreadyExists(dst_dir)),
        Err(_) => {}
    }

    fs_utils::ensure_parent_dir(&dst_dir)?;
    let parent = dst_dir.parent().unwrap_or(Path::new("."));
    let mut builder = tempfile::Builder::new();
    builder.prefix(".simfetch-extract-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // mkdir applies the umask to this mode, as for a plain create_dir.
        builder.permissions(std::fs::Permissions::from_mode(0o777));
    }
    let staging = builder
        .tempdir_in(parent)
        .map_err(|e| FetchError::io(parent, e))?;

    let count = extract_zip(&archive, staging.path(), reporter)?;
    reporter.debug(&format!(
        "extracted {} entries from {} to {}",
        count,
        archive.display(),
        dst_dir.display()
    ));

    // Collapse `foo/` into a destination that is already called `foo`.
    let wrapper = single_wrapper_dir(staging.path(), &stem);
    let source = match &wrapper {
        Some(inner) if dst_dir.file_name() == Some(stem.as_os_str()) => inner.clone(),
        _ => staging.path().to_path_buf(),
    };
    std::fs::rename(&source, &dst_dir).map_err(|e| FetchError::io(&dst_dir, e))?;

    Ok(effective_root(&dst_dir, &stem))
}

/// The directory callers should read from, after flattening.
fn effective_root(dst_dir: &Path, stem: &OsStr) -> PathBuf {
    if dst_dir.file_name() == Some(stem) {
        return dst_dir.to_path_buf();
    }
    single_wrapper_dir(dst_dir, stem).unwrap_or_else(|| dst_dir.to_path_buf())
}

/// `dir/<stem>` if it is the only entry in `dir` and is a directory.
fn single_wrapper_dir(dir: &Path, stem: &OsStr) -> Option<PathBuf> {
    let mut entries = std::fs::read_dir(dir).ok()?;
    let first = entries.next()?.ok()?;
    if entries.next().is_some() {
        return None;
    }
    let is_dir = first.file_type().ok()?.is_dir();
    (is_dir && first.file_name() == stem).then(|| first.path())
}

/// Extract every entry of a zip archive into `dest`. Returns the entry count.
fn extract_zip(archive_path: &Path, dest: &Path, reporter: &dyn Reporter) -> Result<usize> {
    let file = File::open(archive_path).map_err(|e| FetchError::io(archive_path, e))?;

    let archive_error = |e: zip::result::ZipError| FetchError::Archive {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;
    let count = archive.len();

    for i in 0..count {
        let mut entry = archive.by_index(i).map_err(archive_error)?;

        // Reject anything that would land outside `dest`.
        let relative = match entry.enclosed_name() {
            Some(path) if fs_utils::is_safe_path(&path) => path,
            _ => {
                return Err(FetchError::UnsafeEntry {
                    entry: entry.name().to_string(),
                });
            }
        };
        let outpath = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath).map_err(|e| FetchError::io(&outpath, e))?;
        } else {
            fs_utils::ensure_parent_dir(&outpath)?;

            let mut outfile = File::create(&outpath).map_err(|e| FetchError::io(&outpath, e))?;
            std::io::copy(&mut entry, &mut outfile).map_err(|e| FetchError::io(&outpath, e))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                        .map_err(|e| FetchError::io(&outpath, e))?;
                }
            }
        }

        reporter.entry_extracted(i + 1, count, &relative);
    }

    Ok(count)
}


#[cfg(test)]
mod tests {
    use super::testing::write_zip;
    use super::*;
    use crate::core::reporter::SilentReporter;
    use crate::core::reporter::testing::RecordingReporter;

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_is_supported_archive() {
        assert!(is_supported_archive(Path::new("a/foo.zip")));
        assert!(is_supported_archive(Path::new("FOO.ZIP")));
        assert!(!is_supported_archive(Path::new("foo.tar.gz")));
        assert!(!is_supported_archive(Path::new("foo")));
    }

    #[test]
    fn test_default_extract_dir() {
        assert_eq!(
            default_extract_dir(Path::new("/data/grid.zip")),
            PathBuf::from("/data/grid")
        );
    }

    #[test]
    fn test_unsupported_format() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.rar");
        std::fs::write(&archive, b"not a zip").unwrap();

        let err = extract(&archive, None, true, &SilentReporter).unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extract_preserves_relative_paths() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.zip");
        write_zip(
            &archive,
            &[
                ("Node.csv", b"id;name\n1;a\n"),
                ("profiles/", b""),
                ("profiles/Load.csv", b"time;p\n"),
            ],
        );
        let reporter = RecordingReporter::default();

        let dir = extract(&archive, None, true, &reporter).unwrap();

        assert_eq!(dir, temp.path().join("grid"));
        assert_eq!(listing(&dir), vec!["Node.csv", "profiles"]);
        assert_eq!(
            std::fs::read_to_string(dir.join("profiles/Load.csv")).unwrap(),
            "time;p\n"
        );
        assert_eq!(
            reporter.entries.lock().unwrap().clone(),
            vec![(1, 3), (2, 3), (3, 3)]
        );
    }

    #[test]
    fn test_extract_to_explicit_dir() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.zip");
        write_zip(&archive, &[("a.csv", b"1")]);
        let dst = temp.path().join("nested/out");

        let dir = extract(&archive, Some(&dst), true, &SilentReporter).unwrap();

        assert_eq!(dir, dst);
        assert!(dst.join("a.csv").is_file());
    }

    #[test]
    fn test_flatten_wrapper_named_like_archive() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("foo.zip");
        write_zip(
            &archive,
            &[("foo/", b""), ("foo/Line.csv", b"x"), ("foo/Node.csv", b"y")],
        );

        let dir = extract(&archive, None, true, &SilentReporter).unwrap();

        assert!(dir.ends_with("foo"));
        assert!(!dir.ends_with("foo/foo"));
        assert_eq!(listing(&dir), vec!["Line.csv", "Node.csv"]);
    }

    #[test]
    fn test_flatten_into_explicit_dir_returns_inner() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("foo.zip");
        write_zip(&archive, &[("foo/", b""), ("foo/Line.csv", b"x")]);
        let dst = temp.path().join("out");

        let dir = extract(&archive, Some(&dst), true, &SilentReporter).unwrap();

        assert_eq!(dir, dst.join("foo"));
        assert!(dir.join("Line.csv").is_file());
    }

    #[test]
    fn test_no_flatten_when_wrapper_name_differs() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("foo.zip");
        write_zip(&archive, &[("bar/", b""), ("bar/Line.csv", b"x")]);

        let dir = extract(&archive, None, true, &SilentReporter).unwrap();

        assert_eq!(dir, temp.path().join("foo"));
        assert_eq!(listing(&dir), vec!["bar"]);
    }

    #[test]
    fn test_extract_twice_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("foo.zip");
        write_zip(&archive, &[("foo/", b""), ("foo/Node.csv", b"y")]);

        let first = extract(&archive, None, true, &SilentReporter).unwrap();
        let marker = first.join("local-edit.txt");
        std::fs::write(&marker, b"kept").unwrap();
        let reporter = RecordingReporter::default();

        let second = extract(&archive, None, true, &reporter).unwrap();

        assert_eq!(first, second);
        assert!(marker.exists());
        assert!(reporter.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_extract_twice_into_explicit_dir_returns_same_path() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("foo.zip");
        write_zip(&archive, &[("foo/", b""), ("foo/Node.csv", b"y")]);
        let dst = temp.path().join("out");

        let first = extract(&archive, Some(&dst), true, &SilentReporter).unwrap();
        let second = extract(&archive, Some(&dst), true, &SilentReporter).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_already_exists_leaves_dir_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.zip");
        write_zip(&archive, &[("a.csv", b"1")]);
        let dst = temp.path().join("grid");
        std::fs::create_dir(&dst).unwrap();
        std::fs::write(dst.join("stale.csv"), b"old").unwrap();

        let err = extract(&archive, None, false, &SilentReporter).unwrap_err();

        assert!(matches!(err, FetchError::AlreadyExists(_)));
        assert_eq!(listing(&dst), vec!["stale.csv"]);
    }

    #[test]
    fn test_destination_file_is_invalid() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.zip");
        write_zip(&archive, &[("a.csv", b"1")]);
        std::fs::write(temp.path().join("grid"), b"in the way").unwrap();

        let err = extract(&archive, None, true, &SilentReporter).unwrap_err();
        assert!(matches!(err, FetchError::InvalidDestination(_)));
    }

    #[test]
    fn test_rejects_traversal_entry() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("evil.zip");
        write_zip(&archive, &[("ok.csv", b"1"), ("../escaped.txt", b"pwned")]);

        let err = extract(&archive, None, true, &SilentReporter).unwrap_err();

        assert!(matches!(err, FetchError::UnsafeEntry { .. }));
        assert!(!temp.path().join("escaped.txt").exists());
        // Nothing is published when extraction fails part way.
        assert!(!temp.path().join("evil").exists());
        assert_eq!(listing(temp.path()), vec!["evil.zip"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_extracted_dir_mode_matches_plain_mkdir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("grid.zip");
        write_zip(&archive, &[("a.csv", b"1")]);
        let plain = temp.path().join("plain");
        std::fs::create_dir(&plain).unwrap();

        let dir = extract(&archive, None, true, &SilentReporter).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dir), mode(&plain));
    }

    #[test]
    fn test_corrupt_archive() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("broken.zip");
        std::fs::write(&archive, b"definitely not a zip file").unwrap();

        let err = extract(&archive, None, true, &SilentReporter).unwrap_err();
        assert!(matches!(err, FetchError::Archive { .. }));
        assert!(!temp.path().join("broken").exists());
    }
}
