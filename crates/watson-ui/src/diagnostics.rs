//! Failure reporting for swallowed backend errors.
//!
//! Backend failures never reach the user. They are resolved to a safe default
//! at the call site and reported here, so hosts can log them and tests can
//! assert on them.

use std::fmt;

use parking_lot::Mutex;
use watson_core::BackendError;

/// Backend operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Search,
    GetSettings,
    SaveSettings,
    ExecuteAction,
    ReindexApps,
    ReindexFiles,
    ShowWindow,
    HideWindow,
    ResizeWindow,
    Scratchpad,
    Note,
    ClearClipboardHistory,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::GetSettings => "get_settings",
            Operation::SaveSettings => "save_settings",
            Operation::ExecuteAction => "execute_action",
            Operation::ReindexApps => "reindex_apps",
            Operation::ReindexFiles => "reindex_files",
            Operation::ShowWindow => "show_window",
            Operation::HideWindow => "hide_window",
            Operation::ResizeWindow => "resize_window",
            Operation::Scratchpad => "scratchpad",
            Operation::Note => "note",
            Operation::ClearClipboardHistory => "clear_clipboard_history",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A swallowed backend failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub operation: Operation,
    pub error: BackendError,
}

/// Receiver for swallowed failures.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: Failure);
}

/// Default sink: one `warn` event per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: Failure) {
        tracing::warn!(
            operation = %failure.operation,
            "Backend call failed: {}",
            failure.error
        );
    }
}

/// Sink that keeps failures in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    failures: Mutex<Vec<Failure>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded failures, oldest first.
    pub fn failures(&self) -> Vec<Failure> {
        self.failures.lock().clone()
    }

    /// Operations that failed, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.failures.lock().iter().map(|f| f.operation).collect()
    }
}

impl FailureSink for RecordingSink {
    fn record(&self, failure: Failure) {
        TracingSink.record(failure.clone());
        self.failures.lock().push(failure);
    }
}
