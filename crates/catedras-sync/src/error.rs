//! Error types for catedras-sync

use catedras_core::CoreError;
use catedras_store::StorageError;
use thiserror::Error;

/// Errors raised while running a sync.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("extraction error: {0}")]
    Core(#[from] CoreError),

    /// Report bytes are not valid UTF-8
    #[error("report {key} is not valid UTF-8")]
    InvalidEncoding { key: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Fail-fast run stopped at the first unreadable report
    #[error("sync aborted at {key}: {reason}")]
    Aborted { key: String, reason: String },
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
