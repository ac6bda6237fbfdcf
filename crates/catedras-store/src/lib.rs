//! catedras-store: where reports come from and where reconciled subjects go
//!
//! Defines the `ReportSource` and `OfferingStore` traits together with a
//! directory-backed source, a single-file JSON store and in-memory fakes.

mod error;
pub mod fakes;
mod fs_source;
mod json_store;
pub mod storage_traits;

pub use error::StorageError;
pub use fs_source::FsReportSource;
pub use json_store::JsonFileStore;
pub use storage_traits::{
    OfferingStore, ReportKey, ReportMeta, ReportSource, StorageResult, UpsertOutcome,
};
