//! Structured observability hooks for report parsing and sync runs.
//!
//! Each hook emits one `info!` line tagged with an `event` field so log
//! pipelines can filter on it. Set `RUST_LOG=debug` to also see the skip
//! decisions made inside the extractors.

use tracing::{info, warn};

use crate::model::Offer;
use crate::term::Term;

/// RAII guard that enters a `catedras.sync` span for the duration of a run.
///
/// ```ignore
/// let _span = SyncSpan::enter("0b7c...");
/// // every log line below carries sync_id = "0b7c..."
/// ```
pub struct SyncSpan {
    _span: tracing::span::EnteredSpan,
}

impl SyncSpan {
    pub fn enter(sync_id: &str) -> Self {
        Self {
            _span: sync_span(sync_id).entered(),
        }
    }
}

/// The `catedras.sync` span itself, for instrumenting async work with
/// `tracing::Instrument` where an entered guard cannot be held across awaits.
pub fn sync_span(sync_id: &str) -> tracing::Span {
    tracing::info_span!("catedras.sync", sync_id = %sync_id)
}

/// Emit event: one report parsed into offers.
pub fn emit_report_parsed(key: &str, program: &str, offers: &[Offer]) {
    let subjects: usize = offers.iter().map(|o| o.subjects.len()).sum();
    let latest = offers.iter().map(|o| o.term).max();
    info!(
        event = "report.parsed",
        key = %key,
        program = %program,
        terms = offers.len(),
        subjects = subjects,
        latest_term = %latest.map(|t| t.to_string()).unwrap_or_default(),
    );
}

/// Emit event: a report contributed nothing (unreadable or without terms).
pub fn emit_report_skipped(key: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "report.skipped", key = %key, reason = %reason);
}

/// Emit event: a report's declared term was not among its headers.
pub fn emit_term_missing(key: &str, term: Term) {
    warn!(event = "report.term_missing", key = %key, term = %term);
}

/// Emit event: reconciliation finished.
pub fn emit_reconcile_finished(offers: usize, subjects: usize) {
    info!(event = "reconcile.finished", offers = offers, subjects = subjects);
}

/// Emit event: sync run started.
pub fn emit_sync_started(sync_id: &str, reports: usize, workers: usize) {
    info!(event = "sync.started", sync_id = %sync_id, reports = reports, workers = workers);
}

/// Emit event: sync run finished.
pub fn emit_sync_finished(sync_id: &str, duration_ms: u64, subjects: usize, failed: usize) {
    info!(
        event = "sync.finished",
        sync_id = %sync_id,
        duration_ms = duration_ms,
        subjects = subjects,
        reports_failed = failed,
    );
}
