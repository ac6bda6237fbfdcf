//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryReportSource` and `MemoryOfferingStore`, which satisfy the
//! trait contracts without touching the filesystem.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use catedras_core::ReconciledSubject;

use crate::error::StorageError;
use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryReportSource
// ---------------------------------------------------------------------------

/// In-memory report source backed by a `BTreeMap<key, (meta, bytes)>`.
#[derive(Debug, Default)]
pub struct MemoryReportSource {
    reports: Mutex<BTreeMap<ReportKey, (ReportMeta, Vec<u8>)>>,
}

impl MemoryReportSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a report.
    pub fn insert(&self, meta: ReportMeta, body: impl Into<Vec<u8>>) {
        let mut reports = self.reports.lock().unwrap();
        reports.insert(meta.key.clone(), (meta, body.into()));
    }
}

#[async_trait]
impl ReportSource for MemoryReportSource {
    async fn list_reports(&self) -> StorageResult<Vec<ReportMeta>> {
        let reports = self.reports.lock().unwrap();
        Ok(reports.values().map(|(meta, _)| meta.clone()).collect())
    }

    async fn fetch_report(&self, key: &ReportKey) -> StorageResult<Vec<u8>> {
        let reports = self.reports.lock().unwrap();
        reports
            .get(key)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| StorageError::ReportNotFound {
                key: key.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// MemoryOfferingStore
// ---------------------------------------------------------------------------

/// In-memory offering store backed by a `BTreeMap<subject name, record>`.
#[derive(Debug, Default)]
pub struct MemoryOfferingStore {
    records: Mutex<BTreeMap<String, ReconciledSubject>>,
}

impl MemoryOfferingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OfferingStore for MemoryOfferingStore {
    async fn upsert_subject(&self, record: &ReconciledSubject) -> StorageResult<UpsertOutcome> {
        let mut records = self.records.lock().unwrap();
        Ok(apply_upsert(&mut records, record))
    }

    async fn list_subjects(&self) -> StorageResult<Vec<ReconciledSubject>> {
        let records = self.records.lock().unwrap();
        Ok(records.values().cloned().collect())
    }
}
