//! Download-and-unpack in one call
//!
//! ## Example
//!
//! ```no_run
//! use simfetch::{fetch_and_unpack, simbench_url, DownloadOptions, SilentReporter, UreqTransport};
//!
//! let url = simbench_url("1-LV-rural1--0-sw");
//! let options = DownloadOptions::new().dir("/var/cache/simbench");
//! let csv_dir = fetch_and_unpack(&UreqTransport::new(), &SilentReporter, &url, &options).unwrap();
//! println!("{}", csv_dir.display());
//! ```

use crate::acquire::download::{self, DownloadOptions};
use crate::acquire::http::Transport;
use crate::core::error::{FetchError, Result};
use crate::core::reporter::Reporter;
use crate::extract;
use std::path::PathBuf;

/// SimBench CSV download endpoint; `{code}` is the dataset code.
pub const SIMBENCH_URL_TEMPLATE: &str =
    "http://141.51.193.167/simbench/gui/usecase/download/?simbench_code={code}&format=csv";

/// Download URL for a SimBench dataset code such as `1-LV-rural1--0-sw`.
pub fn simbench_url(code: &str) -> String {
    SIMBENCH_URL_TEMPLATE.replace("{code}", code)
}

/// Download `url` and extract it next to the downloaded file.
///
/// With `options.overwrite`, the download and any previous extraction
/// directory are rebuilt.
pub fn fetch_and_unpack(
    transport: &dyn Transport,
    reporter: &dyn Reporter,
    url: &str,
    options: &DownloadOptions,
) -> Result<PathBuf> {
    let src_file = download::download(transport, reporter, url, options)?;
    if !extract::is_supported_archive(&src_file) {
        return Err(FetchError::UnsupportedFormat(src_file));
    }
    let dst_dir = extract::default_extract_dir(&src_file);

    // A non-directory here is left for `extract` to reject.
    if options.overwrite && dst_dir.is_dir() {
        reporter.debug(&format!("removing previous extraction {}", dst_dir.display()));
        std::fs::remove_dir_all(&dst_dir).map_err(|e| FetchError::io(&dst_dir, e))?;
    }

    extract::extract(&src_file, Some(&dst_dir), !options.overwrite, reporter)
}
