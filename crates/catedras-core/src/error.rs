//! Error taxonomy for the extraction core.
//!
//! Malformed headers, conditional sections and placeholder teachers are
//! skipped silently by the extractors and never show up here. The only
//! structural failure is asking for the latest term of a report that has none.

/// Errors produced by the extraction core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("no usable term header found in report")]
    NoTermsFound,

    #[error("invalid term: year {year}, number {number} (expected 1 or 2)")]
    InvalidTerm { year: u16, number: u8 },

    #[error("invalid term label: {0} (expected YYYY-N)")]
    InvalidTermLabel(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
