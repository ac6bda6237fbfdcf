//! Sync run configuration.

use crate::error::{Result, SyncError};

const DEFAULT_WORKERS: usize = 4;

/// Knobs for one sync run.
///
/// | field       | env var              | default |
/// |-------------|----------------------|---------|
/// | `workers`   | `CATEDRAS_WORKERS`   | 4       |
/// | `fail_fast` | `CATEDRAS_FAIL_FAST` | false   |
/// | `programs`  | `CATEDRAS_PROGRAMS`  | all     |
/// | `dry_run`   | `CATEDRAS_DRY_RUN`   | false   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Maximum reports fetched and parsed at once. Never below 1.
    pub workers: usize,
    /// Abort on the first unreadable report instead of counting it as failed.
    pub fail_fast: bool,
    /// Only sync reports whose program is listed.
    pub programs: Option<Vec<String>>,
    /// Reconcile without writing to the store.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            fail_fast: false,
            programs: None,
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Build from `CATEDRAS_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("CATEDRAS_WORKERS") {
            let workers = raw.trim().parse::<usize>().map_err(|_| {
                SyncError::Config(format!("CATEDRAS_WORKERS must be a number, got {raw:?}"))
            })?;
            config = config.with_workers(workers);
        }
        if let Some(raw) = lookup("CATEDRAS_FAIL_FAST") {
            config.fail_fast = parse_flag(&raw);
        }
        if let Some(raw) = lookup("CATEDRAS_PROGRAMS") {
            config = config.with_programs(raw.split(','));
        }
        if let Some(raw) = lookup("CATEDRAS_DRY_RUN") {
            config.dry_run = parse_flag(&raw);
        }

        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Restrict to the given programs. Blank entries are ignored; an empty
    /// list lifts the restriction.
    pub fn with_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let programs: Vec<String> = programs
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self.programs = if programs.is_empty() {
            None
        } else {
            Some(programs)
        };
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether reports of `program` take part in the run.
    pub fn includes_program(&self, program: &str) -> bool {
        match &self.programs {
            Some(programs) => programs.iter().any(|p| p == program.trim()),
            None => true,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
