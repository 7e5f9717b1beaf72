//! Error types for the reconciliation engine

use shared_types::{DataError, ScreenId, StatusTarget};
use thiserror::Error;

/// Errors surfaced to the caller of the reconciliation engine
///
/// Duplicate or stale events are never errors; they are absorbed as no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Snapshot fetch for screen {screen_id} failed: {source}")]
    ReloadFailed {
        screen_id: ScreenId,
        #[source]
        source: DataError,
    },

    #[error("Backend rejected {target} {id} status change: {reason}")]
    WriteRejected {
        target: StatusTarget,
        id: u64,
        reason: String,
    },

    #[error("Status write for {target} {id} failed: {source}")]
    WriteFailed {
        target: StatusTarget,
        id: u64,
        #[source]
        source: DataError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
