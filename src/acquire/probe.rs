//! Remote metadata parsing
//!
//! Pure functions over header values; the network side lives in `http`.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// What a header-only probe learned about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResource {
    /// HTTP status code, verbatim.
    pub status: u16,
    /// `Content-Length`, or 0 when the server did not send one.
    pub size: u64,
    /// File name suggested by `Content-Disposition`, if any.
    pub suggested_name: Option<String>,
}

impl RemoteResource {
    /// Build from raw header values as a transport sees them.
    pub fn from_headers(
        status: u16,
        content_length: Option<&str>,
        content_disposition: Option<&str>,
    ) -> Self {
        Self {
            status,
            size: parse_content_length(content_length),
            suggested_name: content_disposition.and_then(parse_content_disposition_filename),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Parse a `Content-Length` value. Missing or malformed values count as 0.
pub fn parse_content_length(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bfilename\s*=\s*(?:"([^"]*)"|([^;\s]+))"#)
            .expect("filename pattern is valid")
    })
}

/// Extract the `filename` token from a `Content-Disposition` header value.
///
/// Accepts both quoted (`filename="a.zip"`) and bare (`filename=a.zip`)
/// forms. Only the final path component is kept, so a value like
/// `"../../etc/passwd"` yields `passwd`. Returns `None` when no usable name
/// is present.
///
/// # Example
/// ```
/// use simfetch::acquire::probe::parse_content_disposition_filename;
///
/// let name = parse_content_disposition_filename(r#"attachment; filename="grid.zip""#);
/// assert_eq!(name.as_deref(), Some("grid.zip"));
/// ```
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let caps = filename_pattern().captures(header_value)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();

    let name = Path::new(raw).file_name()?.to_str()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
