//! Cached download and archive extraction for remote datasets
//!
//! Fetches a file over HTTP, reuses a previous download when the remote size
//! is unchanged, and unpacks zip archives into a stable directory that
//! downstream readers can consume directly.
//!
//! # Example
//!
//! ```no_run
//! use simfetch::{fetch_and_unpack, ConsoleReporter, DownloadOptions, UreqTransport};
//!
//! let transport = UreqTransport::new();
//! let reporter = ConsoleReporter::new(false);
//! let options = DownloadOptions::new().dir("~/.cache/simfetch");
//!
//! let dir = fetch_and_unpack(&transport, &reporter, "https://example.com/grid.zip", &options)?;
//! for entry in std::fs::read_dir(dir)? {
//!     println!("{}", entry?.path().display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Operations
//!
//! - `Transport::probe(url)` - Status, size and suggested name without the body
//! - `resolve_path(dir, file, seed)` - Deterministic local path for a download
//! - `download(...)` - Cached download with atomic publication
//! - `extract(archive, dst, skip_if_exists)` - Idempotent zip extraction
//! - `fetch_and_unpack(...)` - Download then extract
//!
//! # Concurrency
//!
//! All operations block. Calls for different destinations may run in
//! parallel; calls for the same destination race and need external locking.

pub mod acquire;
pub mod core;
pub mod extract;
pub mod fetch;
mod internal;

pub use acquire::{
    Body, CacheDecision, DownloadOptions, RemoteResource, Transport, UreqTransport, download,
    resolve_path,
};
pub use crate::core::error::{FetchError, Result};
pub use crate::core::output;
pub use crate::core::reporter::{ConsoleReporter, Reporter, SilentReporter};
pub use extract::extract;
pub use fetch::{fetch_and_unpack, simbench_url};
