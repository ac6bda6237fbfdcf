//! Error types for catedras-store

use thiserror::Error;

/// Errors raised by report sources and offering stores.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested report does not exist in the source
    #[error("report not found: {key}")]
    ReportNotFound { key: String },

    /// A report key that cannot be resolved safely
    #[error("invalid report key: {key}")]
    InvalidKey { key: String },

    /// Side-car metadata present but unusable
    #[error("invalid metadata for {key}: {reason}")]
    InvalidMetadata { key: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::ReportNotFound {
            key: "informatica.txt".to_string(),
        };
        assert!(err.to_string().contains("informatica.txt"));

        let err = StorageError::InvalidMetadata {
            key: "k".to_string(),
            reason: "bad term".to_string(),
        };
        assert!(err.to_string().contains("bad term"));
    }
}
