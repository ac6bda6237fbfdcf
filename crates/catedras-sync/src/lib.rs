//! catedras-sync: end-to-end runs over a report source
//!
//! Lists reports, fetches and parses them concurrently, folds every offer
//! into one reconciled corpus and upserts it into an offering store.

mod config;
mod error;
mod pipeline;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use pipeline::{SyncPipeline, SyncReport};
