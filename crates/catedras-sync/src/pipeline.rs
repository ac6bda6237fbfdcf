//! Sync run orchestration: fetch, parse, reconcile, persist.

use std::sync::Arc;
use std::time::Instant;

use catedras_core::{obs, reconcile, CoreError, CorpusOrder, Offer};
use catedras_store::{OfferingStore, ReportMeta, ReportSource, UpsertOutcome};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// Summary of a complete sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: String,

    /// Reports that passed the program filter.
    pub reports_total: usize,

    /// Reports that could not be fetched, decoded or segmented.
    pub reports_failed: usize,

    /// Offers folded into the reconciler.
    pub offers: usize,

    /// Distinct subjects after reconciliation.
    pub subjects: usize,

    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    /// Records written to the store (zero on a dry run).
    pub fn written(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Sync orchestrator.
pub struct SyncPipeline;

impl SyncPipeline {
    /// Run one sync from `source` into `store`.
    ///
    /// Reports are fetched and parsed with at most `config.workers` in
    /// flight. Parsed offers are folded in report key order so the outcome
    /// does not depend on which fetch finished first. Subjects are upserted
    /// in name order unless `config.dry_run` is set.
    pub async fn run(
        source: Arc<dyn ReportSource>,
        store: Arc<dyn OfferingStore>,
        config: &SyncConfig,
    ) -> Result<SyncReport> {
        let run_id = Uuid::new_v4().to_string();
        let span = obs::sync_span(&run_id);
        Self::run_inner(run_id, source, store, config)
            .instrument(span)
            .await
    }

    async fn run_inner(
        run_id: String,
        source: Arc<dyn ReportSource>,
        store: Arc<dyn OfferingStore>,
        config: &SyncConfig,
    ) -> Result<SyncReport> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let reports: Vec<ReportMeta> = source
            .list_reports()
            .await?
            .into_iter()
            .filter(|meta| {
                let keep = config.includes_program(&meta.program);
                if !keep {
                    debug!(key = %meta.key, program = %meta.program, "program filtered out");
                }
                keep
            })
            .collect();
        let reports_total = reports.len();
        let workers = config.workers.max(1);
        obs::emit_sync_started(&run_id, reports_total, workers);

        let mut loads = stream::iter(reports)
            .map(|meta| {
                let source = Arc::clone(&source);
                async move {
                    let result = load_report(source.as_ref(), &meta).await;
                    (meta, result)
                }
            })
            .buffer_unordered(workers);

        let mut loaded: Vec<(ReportMeta, Vec<Offer>)> = Vec::with_capacity(reports_total);
        let mut reports_failed = 0;
        while let Some((meta, result)) = loads.next().await {
            match result {
                Ok(offers) => {
                    obs::emit_report_parsed(meta.key.as_str(), &meta.program, &offers);
                    loaded.push((meta, offers));
                }
                Err(e) => {
                    obs::emit_report_skipped(meta.key.as_str(), &e);
                    if config.fail_fast {
                        return Err(SyncError::Aborted {
                            key: meta.key.to_string(),
                            reason: e.to_string(),
                        });
                    }
                    reports_failed += 1;
                }
            }
        }

        loaded.sort_by(|a, b| a.0.key.cmp(&b.0.key));
        let offers: Vec<Offer> = loaded
            .into_iter()
            .flat_map(|(_, offers)| offers)
            .collect();
        let corpus = reconcile(&offers);
        obs::emit_reconcile_finished(offers.len(), corpus.len());

        let (mut inserted, mut updated, mut unchanged) = (0, 0, 0);
        if config.dry_run {
            debug!(subjects = corpus.len(), "dry run, store left untouched");
        } else {
            for record in corpus.ordered(CorpusOrder::Name) {
                match store.upsert_subject(record).await? {
                    UpsertOutcome::Inserted => inserted += 1,
                    UpsertOutcome::Updated => updated += 1,
                    UpsertOutcome::Unchanged => unchanged += 1,
                }
            }
        }

        let duration_ms = clock.elapsed().as_millis() as u64;
        obs::emit_sync_finished(&run_id, duration_ms, corpus.len(), reports_failed);

        Ok(SyncReport {
            run_id,
            reports_total,
            reports_failed,
            offers: offers.len(),
            subjects: corpus.len(),
            inserted,
            updated,
            unchanged,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Fetch, decode and parse one report.
///
/// A report with no usable term header is a failure. When the metadata pins
/// a term, only offers for that term are kept; a pinned term missing from the
/// text is logged and contributes nothing.
async fn load_report(source: &dyn ReportSource, meta: &ReportMeta) -> Result<Vec<Offer>> {
    let bytes = source.fetch_report(&meta.key).await?;
    let text = String::from_utf8(bytes).map_err(|_| SyncError::InvalidEncoding {
        key: meta.key.to_string(),
    })?;

    let offers = Offer::parse(&meta.program, &text);
    if offers.is_empty() {
        return Err(CoreError::NoTermsFound.into());
    }

    let Some(term) = meta.term else {
        return Ok(offers);
    };
    let kept: Vec<Offer> = offers.into_iter().filter(|o| o.term == term).collect();
    if kept.is_empty() {
        obs::emit_term_missing(meta.key.as_str(), term);
    }
    Ok(kept)
}
