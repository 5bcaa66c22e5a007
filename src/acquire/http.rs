//! HTTP transport for acquisition
//!
//! `Transport` is the seam between the download logic and the network. The
//! production implementation uses a blocking `ureq` agent; tests substitute
//! an in-memory fake.
//!
//! ## Configuration
//!
//! The request timeout can be set through the environment:
//! ```bash
//! export SIMFETCH_HTTP_TIMEOUT=120
//! ```

use super::probe::RemoteResource;
use crate::core::error::{FetchError, Result};
use std::io::Read;
use std::time::Duration;

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the HTTP timeout
pub const TIMEOUT_ENV: &str = "SIMFETCH_HTTP_TIMEOUT";

const USER_AGENT: &str = concat!("simfetch/", env!("CARGO_PKG_VERSION"));

/// Clamp a timeout to a reasonable range (5-300 seconds).
pub fn clamp_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(5, 300))
}

/// Timeout from `SIMFETCH_HTTP_TIMEOUT`, or the default.
pub fn timeout_from_env() -> Duration {
    let secs = std::env::var(TIMEOUT_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    clamp_timeout(secs)
}

/// An open response body.
pub struct Body {
    /// `Content-Length` of the body response, if the server sent one.
    pub content_length: Option<u64>,
    pub reader: Box<dyn Read + Send>,
}

/// Network capability used by the downloader.
pub trait Transport {
    /// Fetch response headers only. Non-200 statuses are returned, not raised;
    /// only an unreachable remote is a `FetchError::Network`.
    fn probe(&self, url: &str) -> Result<RemoteResource>;

    /// Open the response body for streaming. Fails on any non-200 status.
    fn open(&self, url: &str) -> Result<Body>;
}

/// Blocking HTTP transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport with the timeout taken from the environment.
    pub fn new() -> Self {
        Self::with_timeout(timeout_from_env())
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn probe(&self, url: &str) -> Result<RemoteResource> {
        // The body is never read; dropping the response closes the connection.
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(e)) => return Err(FetchError::network(url, e)),
        };

        Ok(RemoteResource::from_headers(
            response.status(),
            response.header("content-length"),
            response.header("content-disposition"),
        ))
    }

    fn open(&self, url: &str) -> Result<Body> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(FetchError::network(url, format!("HTTP {}", code)));
            }
            Err(ureq::Error::Transport(e)) => return Err(FetchError::network(url, e)),
        };

        if response.status() != 200 {
            return Err(FetchError::network(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let content_length = response
            .header("content-length")
            .and_then(|s| s.parse().ok());

        Ok(Body {
            content_length,
            reader: Box::new(response.into_reader()),
        })
    }
}
