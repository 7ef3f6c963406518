//! Diagnostics raised on the event path and reported later.

use leetaccel_errors::{ErrorSeverity, RTError};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::types::DeviceHandle;

/// One hot-path diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticEvent {
    /// Device the event path was handling.
    pub device: DeviceHandle,
    /// What happened.
    pub error: RTError,
}

impl DiagnosticEvent {
    /// Log through `tracing` at a level matching the severity.
    pub fn log(&self) {
        let handle = self.device.get();
        let code = self.error.code();
        match self.error.severity() {
            ErrorSeverity::Info => info!(device = handle, code, "{}", self.error),
            ErrorSeverity::Warning => warn!(device = handle, code, "{}", self.error),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(device = handle, code, "{}", self.error);
            }
        }
    }
}

/// Drained diagnostics grouped by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSummary {
    /// `(code name, count)` in code order, zero counts omitted.
    pub counts: Vec<(String, u64)>,
    /// Records lost to a full queue.
    pub dropped: u64,
}

impl DiagnosticSummary {
    /// Summarize `events`.
    pub fn from_events(events: &[DiagnosticEvent], dropped: u64) -> Self {
        let counts = RTError::ALL
            .iter()
            .filter_map(|code| {
                let n = events.iter().filter(|e| e.error == *code).count();
                let n = u64::try_from(n).unwrap_or(u64::MAX);
                (n > 0).then(|| (format!("{code:?}"), n))
            })
            .collect();
        debug!(total = events.len(), dropped, "Summarized diagnostics");
        Self { counts, dropped }
    }

    /// True when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.dropped == 0
    }
}
