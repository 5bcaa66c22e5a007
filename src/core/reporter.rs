//! Observers for acquisition progress and diagnostics
//!
//! Every download/extract operation takes a `&dyn Reporter`. Nothing is
//! logged through global state: pass `SilentReporter` when embedding, or
//! `ConsoleReporter` for terminal output.
//!
//! Reporting is a side channel. Implementations must not panic and cannot
//! influence control flow.

use crate::core::output;
use crate::internal::progress;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Mutex;

/// Receives diagnostics and progress from acquisition operations.
pub trait Reporter {
    /// Verbose diagnostic (cache decisions, resolved paths).
    fn debug(&self, _message: &str) {}

    /// Non-fatal problem, e.g. an empty download.
    fn warning(&self, _message: &str) {}

    /// A body transfer is starting. `total` is `None` while the size is unknown.
    fn transfer_started(&self, _label: &str, _total: Option<u64>) {}

    /// Cumulative bytes written so far. `total` may switch from `None` to
    /// `Some` mid-transfer.
    fn transfer_progress(&self, _transferred: u64, _total: Option<u64>) {}

    fn transfer_finished(&self) {}

    /// Entry `index` (1-based) of `count` has been written.
    fn entry_extracted(&self, _index: usize, _count: usize, _name: &Path) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Terminal reporter with colored lines and an indicatif transfer bar.
#[derive(Default)]
pub struct ConsoleReporter {
    verbose: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            bar: Mutex::new(None),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        // A poisoned lock only means an earlier report panicked; keep going.
        let mut guard = match self.bar.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl Reporter for ConsoleReporter {
    fn debug(&self, message: &str) {
        if self.verbose {
            output::detail(message);
        }
    }

    fn warning(&self, message: &str) {
        output::warning(message);
    }

    fn transfer_started(&self, label: &str, total: Option<u64>) {
        self.with_bar(|bar| {
            if let Some(old) = bar.take() {
                old.finish_and_clear();
            }
            *bar = Some(progress::create_download_progress(label, total));
        });
    }

    fn transfer_progress(&self, transferred: u64, total: Option<u64>) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                if let Some(total) = total
                    && progress::is_spinner(pb)
                {
                    progress::upgrade_to_bytes(pb, total);
                }
                pb.set_position(transferred);
            }
        });
    }

    fn transfer_finished(&self) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
        });
    }

    fn entry_extracted(&self, index: usize, count: usize, name: &Path) {
        if self.verbose {
            output::detail(&format!("({}/{}) {}", index, count, name.display()));
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Reporter that records every event for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        pub debugs: Mutex<Vec<String>>,
        pub warnings: Mutex<Vec<String>>,
        pub progress: Mutex<Vec<(u64, Option<u64>)>>,
        pub entries: Mutex<Vec<(usize, usize)>>,
    }

    impl RecordingReporter {
        pub fn warnings(&self) -> Vec<String> {
            self.warnings.lock().unwrap().clone()
        }

        pub fn debugs(&self) -> Vec<String> {
            self.debugs.lock().unwrap().clone()
        }
    }

    impl Reporter for RecordingReporter {
        fn debug(&self, message: &str) {
            self.debugs.lock().unwrap().push(message.to_string());
        }

        fn warning(&self, message: &str) {
            self.warnings.lock().unwrap().push(message.to_string());
        }

        fn transfer_progress(&self, transferred: u64, total: Option<u64>) {
            self.progress.lock().unwrap().push((transferred, total));
        }

        fn entry_extracted(&self, index: usize, count: usize, _name: &Path) {
            self.entries.lock().unwrap().push((index, count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_reporter_transfer_lifecycle() {
        let reporter = ConsoleReporter::new(false);
        reporter.transfer_started("foo.zip", None);
        reporter.transfer_progress(10, None);
        reporter.transfer_progress(20, Some(100));
        reporter.with_bar(|bar| {
            let pb = bar.as_ref().unwrap();
            assert_eq!(pb.length(), Some(100));
            assert_eq!(pb.position(), 20);
        });
        reporter.transfer_finished();
        reporter.with_bar(|bar| assert!(bar.is_none()));
    }

    #[test]
    fn test_progress_without_transfer_is_ignored() {
        let reporter = ConsoleReporter::new(true);
        reporter.transfer_progress(5, Some(10));
        reporter.transfer_finished();
    }
}
