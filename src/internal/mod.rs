//! Internal utility modules
//!
//! Shared functionality used by the acquisition and extraction code.

pub mod fs_utils;
pub mod progress;
