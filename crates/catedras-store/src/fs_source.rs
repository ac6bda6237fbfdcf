//! Filesystem-backed report source.
//!
//! Layout: one `<stem>.txt` per exported report in a flat directory, with an
//! optional `<stem>.meta.json` side-car:
//!
//! ```json
//! { "program": "Ingeniería en Informática", "term": "2025-1" }
//! ```
//!
//! Without a side-car the program is the file stem and the term is unknown.
//! A side-car that cannot be read does not fail the listing: the report is
//! listed under its stem and `fetch_report` fails for that key alone with
//! `StorageError::InvalidMetadata`, so callers can skip it like any other
//! unreadable report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use catedras_core::Term;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage_traits::{ReportKey, ReportMeta, ReportSource, StorageResult};

const REPORT_EXTENSION: &str = "txt";
const SIDECAR_SUFFIX: &str = ".meta.json";

#[derive(Debug, Default, Deserialize)]
struct Sidecar {
    program: Option<String>,
    term: Option<String>,
}

/// Report source reading `*.txt` exports from a directory.
#[derive(Debug, Clone)]
pub struct FsReportSource {
    root: PathBuf,
}

impl FsReportSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are bare file names; anything that could escape `root` is rejected.
    fn report_path(&self, key: &ReportKey) -> StorageResult<PathBuf> {
        let name = key.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(StorageError::InvalidKey {
                key: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    async fn read_meta(&self, file_name: &str, stem: &str) -> StorageResult<ReportMeta> {
        let sidecar_path = self.root.join(format!("{stem}{SIDECAR_SUFFIX}"));
        let sidecar = match fs::read(&sidecar_path).await {
            Ok(bytes) => serde_json::from_slice::<Sidecar>(&bytes).map_err(|e| {
                StorageError::InvalidMetadata {
                    key: file_name.to_string(),
                    reason: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Sidecar::default(),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let term = sidecar
            .term
            .map(|label| {
                label
                    .parse::<Term>()
                    .map_err(|e| StorageError::InvalidMetadata {
                        key: file_name.to_string(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(ReportMeta {
            key: ReportKey::new(file_name),
            program: sidecar.program.unwrap_or_else(|| stem.to_string()),
            term,
        })
    }
}

#[async_trait]
impl ReportSource for FsReportSource {
    async fn list_reports(&self) -> StorageResult<Vec<ReportMeta>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(REPORT_EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let (Some(name), Some(stem)) = (
                path.file_name().and_then(|n| n.to_str()),
                path.file_stem().and_then(|s| s.to_str()),
            ) {
                names.push((name.to_string(), stem.to_string()));
            }
        }
        names.sort();

        let mut reports = Vec::with_capacity(names.len());
        for (name, stem) in names {
            let meta = match self.read_meta(&name, &stem).await {
                Ok(meta) => meta,
                Err(StorageError::InvalidMetadata { key, reason }) => {
                    warn!(key = %key, reason = %reason, "unusable side-car, report will fail on fetch");
                    ReportMeta::new(name, stem)
                }
                Err(e) => return Err(e),
            };
            debug!(key = %meta.key, program = %meta.program, "found report");
            reports.push(meta);
        }
        Ok(reports)
    }

    async fn fetch_report(&self, key: &ReportKey) -> StorageResult<Vec<u8>> {
        let path = self.report_path(key)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.read_meta(key.as_str(), stem).await?;
        }
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::ReportNotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io(e)
            }
        })
    }
}
