//! Storage trait definitions for catedras
//!
//! These traits stand in for the collaborators around the extraction core:
//! - `ReportSource`: blob-store listing and fetch of raw SIU reports
//! - `OfferingStore`: persistence of reconciled subjects
//!
//! Both are async and backend-agnostic. Implementations are constructed by
//! the caller and passed in; in-memory fakes live in the `fakes` module.

use async_trait::async_trait;
use catedras_core::{ReconciledSubject, Term};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// ReportSource: raw report listing and fetch
// ---------------------------------------------------------------------------

/// Opaque key identifying one report in its source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportKey(pub String);

impl ReportKey {
    pub fn new(key: impl Into<String>) -> Self {
        ReportKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-report metadata known before fetching its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub key: ReportKey,
    /// Academic program (carrera) the report was exported for
    pub program: String,
    /// Term the report was requested for, when the source records it
    pub term: Option<Term>,
}

impl ReportMeta {
    pub fn new(key: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            key: ReportKey::new(key),
            program: program.into(),
            term: None,
        }
    }

    pub fn with_term(mut self, term: Term) -> Self {
        self.term = Some(term);
        self
    }
}

/// Source of raw SIU reports.
///
/// Guarantees:
/// - `list_reports` returns every report once, ordered by key.
/// - `fetch_report` returns the exact bytes stored under a listed key.
/// - A problem confined to one report surfaces from `fetch_report` for that
///   key, never from `list_reports`.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// List available reports with their metadata.
    async fn list_reports(&self) -> StorageResult<Vec<ReportMeta>>;

    /// Fetch the raw bytes of a report. `StorageError::ReportNotFound` if absent.
    async fn fetch_report(&self, key: &ReportKey) -> StorageResult<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// OfferingStore: persistence of reconciled subjects
// ---------------------------------------------------------------------------

/// What an upsert did to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Store of reconciled subjects keyed by subject name.
///
/// Guarantees:
/// - At most one record per subject name.
/// - Upserting an identical record reports `Unchanged` and rewrites nothing.
#[async_trait]
pub trait OfferingStore: Send + Sync {
    /// Insert or replace the record for `record.subject.name`.
    async fn upsert_subject(&self, record: &ReconciledSubject) -> StorageResult<UpsertOutcome>;

    /// All stored records, ordered by subject name.
    async fn list_subjects(&self) -> StorageResult<Vec<ReconciledSubject>>;
}

/// Apply an upsert to a name-keyed map, shared by the bundled stores.
pub(crate) fn apply_upsert(
    records: &mut std::collections::BTreeMap<String, ReconciledSubject>,
    record: &ReconciledSubject,
) -> UpsertOutcome {
    match records.get(&record.subject.name) {
        Some(existing) if existing == record => UpsertOutcome::Unchanged,
        Some(_) => {
            records.insert(record.subject.name.clone(), record.clone());
            UpsertOutcome::Updated
        }
        None => {
            records.insert(record.subject.name.clone(), record.clone());
            UpsertOutcome::Inserted
        }
    }
}
