//! Colored terminal output for simfetch
//!
//! Uses owo-colors for terminal colors. Progress bars live in
//! `internal::progress`.

use owo_colors::OwoColorize;

/// Print an action header (blue, bold)
/// Example: "==> Fetching https://..."
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Print a detail line (dimmed prefix)
/// Example: "     downloaded foo.zip (1024 bytes)"
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
}

/// Print a success message (green)
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}
