//! Batch import entry point.
//!
//! # Responsibility
//! - Parse run locations and start file logging.
//! - Run one import and report the outcome through the exit status.

use anyhow::{anyhow, Context, Result};
use bookdb_core::service::import_service::{DEFAULT_DB_PATH, DEFAULT_INPUT_PATH};
use bookdb_core::{default_log_level, init_logging, run_import, ImportConfig};
use clap::Parser;
use std::path::PathBuf;

/// Load a JSON book collection into a SQLite `books` table.
#[derive(Debug, Parser)]
#[command(name = "bookdb", version)]
struct Cli {
    /// JSON document with a top-level `books` array.
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// SQLite database file; created when missing.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    database: PathBuf,

    /// Directory receiving the per-run log file.
    #[arg(long, default_value = "logs")]
    log_dir: String,

    /// trace|debug|info|warn|error
    #[arg(long, default_value = default_log_level())]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = init_logging(&cli.log_level, &cli.log_dir)
        .map_err(|err| anyhow!(err))
        .context("failed to initialize logging")?;
    let log = logging.sink();

    let config = ImportConfig {
        input_path: cli.input,
        db_path: cli.database,
    };
    let report = run_import(&config, &log).with_context(|| {
        format!(
            "import failed; see logs in {}",
            logging.log_dir().display()
        )
    });
    logging.flush();

    let report = report?;
    println!(
        "imported {} books, {} rows in books",
        report.loaded,
        report.rows.len()
    );
    Ok(())
}
