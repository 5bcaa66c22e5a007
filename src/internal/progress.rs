//! Unified progress bar helpers
//!
//! Provides consistent progress bar styling for transfers and extraction.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Standard spinner characters
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Standard tick interval for spinners
const TICK_INTERVAL_MS: u64 = 80;

const BYTES_TEMPLATE: &str =
    "     {spinner:.cyan} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({eta}) {msg}";

fn byte_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BYTES_TEMPLATE)
        .unwrap()
        .progress_chars("━╸━")
}

/// Create a spinner progress bar with standard styling.
///
/// # Example
/// ```ignore
/// let pb = create_spinner("downloading foo.zip");
/// // ... do work ...
/// pb.finish_and_clear();
/// ```
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("     {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars(SPINNER_CHARS),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(TICK_INTERVAL_MS));
    pb
}

/// Create a progress bar for a transfer whose size may not be known yet.
///
/// Starts as a spinner; becomes a byte bar once `total_bytes` is `Some`.
pub fn create_download_progress(message: &str, total_bytes: Option<u64>) -> ProgressBar {
    let pb = create_spinner(message);
    if let Some(total) = total_bytes {
        upgrade_to_bytes(&pb, total);
    }
    pb
}

/// Upgrade a spinner to a byte progress bar when content length becomes known.
pub fn upgrade_to_bytes(pb: &ProgressBar, total_bytes: u64) {
    pb.set_length(total_bytes);
    pb.set_style(byte_style());
}

/// Whether `pb` still needs `upgrade_to_bytes` before it can show a total.
pub fn is_spinner(pb: &ProgressBar) -> bool {
    pb.length().is_none()
}
