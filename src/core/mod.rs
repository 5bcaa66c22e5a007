//! Core infrastructure: errors, terminal output, and reporting.

pub mod error;
pub mod output;
pub mod reporter;
