//! Progress reporting and cooperative cancellation.
//!
//! Reports are row-granular and purely observational; cancellation is
//! checked between rows so an aborted sweep never leaves a partially
//! written pixel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Severity attached to a progress report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportLevel {
    Normal,
    Warning,
    Error,
}

/// Observer for sweep progress. Implementations must be cheap; the engine
/// calls this once per destination row.
pub trait ProgressSink: Sync {
    fn report(&self, message: &str, percent: u8, level: ReportLevel);
}

/// Discards all reports.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _message: &str, _percent: u8, _level: ReportLevel) {}
}

/// Forwards reports to the `log` facade at the matching level.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, message: &str, percent: u8, level: ReportLevel) {
        match level {
            ReportLevel::Normal => log::info!("{message} ({percent}%)"),
            ReportLevel::Warning => log::warn!("{message} ({percent}%)"),
            ReportLevel::Error => log::error!("{message} ({percent}%)"),
        }
    }
}

/// Shared flag for aborting a sweep between rows.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
