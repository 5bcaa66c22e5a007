//! Acquisition helpers - getting remote files onto local disk
//!
//! ## Modules
//!
//! - **probe**: Parse remote metadata (size, status, suggested file name)
//! - **http**: `Transport` capability and the blocking HTTP implementation
//! - **paths**: Derive the local cache path for a download
//! - **download**: Probe, cache check, streamed transfer, atomic publish

pub mod download;
pub mod http;
pub mod paths;
pub mod probe;

// Re-export commonly used items
pub use download::{CacheDecision, DownloadOptions, download};
pub use http::{Body, Transport, UreqTransport};
pub use paths::{content_addressed_name, resolve_path};
pub use probe::{RemoteResource, parse_content_disposition_filename};
