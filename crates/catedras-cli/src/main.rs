//! catedras - SIU course-offering report extraction CLI
//!
//! ## Commands
//!
//! - `parse`: extract the offers of one exported report
//! - `reconcile`: merge several reports into one record per subject
//! - `sync`: ingest a report directory into a JSON offering store
//!
//! Results go to stdout as JSON; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, Level};

use catedras_core::{reconcile, CorpusOrder, Offer};
use catedras_store::{FsReportSource, JsonFileStore};
use catedras_sync::{SyncConfig, SyncPipeline};

#[derive(Parser)]
#[command(name = "catedras")]
#[command(author = "Catedras Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract and reconcile SIU course-offering reports", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one report and print its offers
    Parse {
        /// Exported report (plain text)
        file: PathBuf,

        /// Program the report belongs to (default: file stem)
        #[arg(short, long)]
        program: Option<String>,

        /// Only print the latest term
        #[arg(long)]
        latest: bool,
    },

    /// Reconcile several reports into one record per subject
    Reconcile {
        /// Exported reports; each file's stem is its program
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output ordering
        #[arg(long, value_enum, default_value_t = OrderArg::Name)]
        order: OrderArg,
    },

    /// Sync a directory of reports into a JSON offering store
    Sync {
        /// Directory holding `*.txt` reports and optional `*.meta.json` side-cars
        #[arg(long, env = "CATEDRAS_REPORTS_DIR")]
        reports_dir: PathBuf,

        /// JSON store file, created if missing
        #[arg(short, long, env = "CATEDRAS_OUTPUT")]
        output: PathBuf,

        /// Maximum reports processed at once
        #[arg(long)]
        workers: Option<usize>,

        /// Abort on the first unreadable report
        #[arg(long)]
        fail_fast: bool,

        /// Only sync these programs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        programs: Vec<String>,

        /// Reconcile without writing the store
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OrderArg {
    Name,
    Code,
    Sections,
}

impl From<OrderArg> for CorpusOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Name => CorpusOrder::Name,
            OrderArg::Code => CorpusOrder::Code,
            OrderArg::Sections => CorpusOrder::SectionCount,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    catedras_core::init_tracing(cli.json, level);

    let output = match cli.command {
        Commands::Parse {
            file,
            program,
            latest,
        } => cmd_parse(&file, program.as_deref(), latest)?,
        Commands::Reconcile { files, order } => cmd_reconcile(&files, order.into())?,
        Commands::Sync {
            reports_dir,
            output,
            workers,
            fail_fast,
            programs,
            dry_run,
        } => {
            let config = sync_config(workers, fail_fast, programs, dry_run)?;
            cmd_sync(&reports_dir, &output, &config).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Program name implied by a report path: its file stem.
fn program_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a program name from {}", path.display()))
}

fn read_report(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn cmd_parse(file: &Path, program: Option<&str>, latest: bool) -> Result<Value> {
    let program = match program {
        Some(p) => p.to_string(),
        None => program_from_path(file)?,
    };
    let text = read_report(file)?;

    if latest {
        let offer = Offer::parse_latest(&program, &text)
            .with_context(|| format!("No offer found in {}", file.display()))?;
        info!(term = %offer.term, subjects = offer.subjects.len(), "Parsed latest term");
        Ok(serde_json::to_value(offer)?)
    } else {
        let offers = Offer::parse(&program, &text);
        info!(terms = offers.len(), "Parsed report");
        Ok(serde_json::to_value(offers)?)
    }
}

fn cmd_reconcile(files: &[PathBuf], order: CorpusOrder) -> Result<Value> {
    let mut offers = Vec::new();
    for file in files {
        let program = program_from_path(file)?;
        let text = read_report(file)?;
        let parsed = Offer::parse(&program, &text);
        if parsed.is_empty() {
            tracing::warn!(file = %file.display(), "No term headers found, skipping");
        }
        offers.extend(parsed);
    }

    let corpus = reconcile(&offers);
    catedras_core::obs::emit_reconcile_finished(offers.len(), corpus.len());
    Ok(serde_json::to_value(corpus.ordered(order))?)
}

/// Environment defaults overlaid with explicit flags.
fn sync_config(
    workers: Option<usize>,
    fail_fast: bool,
    programs: Vec<String>,
    dry_run: bool,
) -> Result<SyncConfig> {
    let mut config = SyncConfig::from_env().context("Invalid CATEDRAS_* environment")?;
    if let Some(workers) = workers {
        config = config.with_workers(workers);
    }
    if fail_fast {
        config = config.with_fail_fast(true);
    }
    if !programs.is_empty() {
        config = config.with_programs(programs);
    }
    if dry_run {
        config = config.with_dry_run(true);
    }
    Ok(config)
}

async fn cmd_sync(reports_dir: &Path, output: &Path, config: &SyncConfig) -> Result<Value> {
    let source = Arc::new(FsReportSource::new(reports_dir));
    let store = Arc::new(
        JsonFileStore::open(output)
            .await
            .with_context(|| format!("Failed to open store {}", output.display()))?,
    );

    let report = SyncPipeline::run(source, store, config)
        .await
        .with_context(|| format!("Sync of {} failed", reports_dir.display()))?;

    info!(
        subjects = report.subjects,
        written = report.written(),
        failed = report.reports_failed,
        "Sync complete"
    );
    Ok(serde_json::to_value(report)?)
}
