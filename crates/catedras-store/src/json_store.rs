//! Single-file JSON offering store.
//!
//! The whole corpus lives in one document that is rewritten after every
//! change. Writes go to a temp file in the same directory and are renamed
//! over the target, so readers never see a half-written document.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catedras_core::ReconciledSubject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StorageError;
use crate::storage_traits::{apply_upsert, OfferingStore, StorageResult, UpsertOutcome};

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    generated_at: DateTime<Utc>,
    subjects: Vec<ReconciledSubject>,
}

/// Offering store persisted as one JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, ReconciledSubject>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing records if the file exists.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let doc: Document = serde_json::from_slice(&bytes)?;
                doc.subjects
                    .into_iter()
                    .map(|r| (r.subject.name.clone(), r))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        debug!(path = %path.display(), records = records.len(), "opened json store");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &BTreeMap<String, ReconciledSubject>) -> StorageResult<()> {
        let doc = Document {
            generated_at: Utc::now(),
            subjects: records.values().cloned().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&doc)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StorageError::Backend(format!("store writer failed: {e}")))?
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl OfferingStore for JsonFileStore {
    async fn upsert_subject(&self, record: &ReconciledSubject) -> StorageResult<UpsertOutcome> {
        let mut records = self.records.lock().await;
        // The in-memory map only moves once the document is on disk.
        let mut next = records.clone();
        let outcome = apply_upsert(&mut next, record);
        if outcome != UpsertOutcome::Unchanged {
            self.persist(&next).await?;
            *records = next;
        }
        Ok(outcome)
    }

    async fn list_subjects(&self) -> StorageResult<Vec<ReconciledSubject>> {
        let records = self.records.lock().await;
        Ok(records.values().cloned().collect())
    }
}
