//! Catedras Core
//!
//! Turns free-text SIU course-offering reports into structured records and
//! reconciles many per-program reports into one latest-known state.
//!
//! ## Pipeline
//!
//! 1. [`segment_terms`] splits a report by `Período lectivo:` headers
//! 2. [`extract_subjects`] splits a term by `Actividad:` headers
//! 3. [`extract_sections`] splits a subject by `Comisión:` headers and unifies variants
//! 4. [`extract_teachers`] reads the `Docentes:` line of a section
//! 5. [`reconcile`] folds offers into a [`ReconciledCorpus`]
//!
//! Every stage is a pure function; nothing here performs I/O.

pub mod error;
pub mod extract;
pub mod model;
pub mod obs;
pub mod reconcile;
pub mod telemetry;
pub mod term;

pub use error::{CoreError, Result};
pub use extract::{
    extract_sections, extract_staffed_sections, extract_subjects, extract_teachers, latest_term,
    segment_terms, RawSubject,
};
pub use model::{normalize_name, normalize_role, Offer, Section, Subject, Teacher};
pub use obs::SyncSpan;
pub use reconcile::{reconcile, CorpusOrder, ReconciledCorpus, ReconciledSubject};
pub use telemetry::init_tracing;
pub use term::Term;

/// Catedras version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
