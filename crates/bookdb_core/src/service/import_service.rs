//! Batch import use case.
//!
//! # Responsibility
//! - Run load → create schema → upsert each book → fetch all → close.
//! - Log every failure with context before returning it.
//!
//! # Invariants
//! - Books are upserted in input order; the first failure aborts the rest.
//! - The repository is closed on success and failure paths alike.
//! - The loaded/persisted count comparison is informational only.

use crate::loader::{load_books_from_path, LoadError};
use crate::logging::LogSink;
use crate::model::book::{BookRecord, BookRow};
use crate::repo::book_repo::{BookRepository, RepoError, SqliteBookRepository};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "sample_data.json";
pub const DEFAULT_DB_PATH: &str = "books.db";

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug)]
pub enum ImportError {
    Load(LoadError),
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<LoadError> for ImportError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Input and output locations for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub input_path: PathBuf,
    pub db_path: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

/// Outcome of a successful batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Number of records parsed from the input.
    pub loaded: usize,
    /// Rows read back from the store after the upserts.
    pub rows: Vec<BookRow>,
}

/// Writes `books` through `repo` and reads the table back.
///
/// # Contract
/// - Calls `create_schema` once, then `upsert` per book in order.
/// - Stops at the first failed upsert; earlier rows stay committed.
/// - Does not close `repo`; the owner does.
pub fn import_books<R: BookRepository>(
    repo: &R,
    books: &[BookRecord],
    log: &dyn LogSink,
) -> ImportResult<Vec<BookRow>> {
    log.info(format_args!(
        "event=import_books module=service status=start count={}",
        books.len()
    ));

    repo.create_schema()?;
    for book in books {
        repo.upsert(book)?;
    }

    let rows = repo.fetch_all()?;
    log.info(format_args!(
        "event=import_verify module=service status=ok loaded={} persisted={}",
        books.len(),
        rows.len()
    ));
    for row in &rows {
        log.debug(format_args!(
            "event=import_verify_row module=service id={} title={:?} author={:?}",
            row.id,
            row.title,
            row.author_name.as_deref().unwrap_or("")
        ));
    }

    Ok(rows)
}

/// Runs one complete batch import described by `config`.
///
/// A malformed input document fails before the database is opened.
pub fn run_import(config: &ImportConfig, log: &dyn LogSink) -> ImportResult<ImportReport> {
    log.info(format_args!(
        "event=run_import module=service status=start input={} db={}",
        config.input_path.display(),
        config.db_path.display()
    ));

    let outcome = load_and_store(config, log);
    match &outcome {
        Ok(report) => log.info(format_args!(
            "event=run_import module=service status=ok loaded={} persisted={}",
            report.loaded,
            report.rows.len()
        )),
        Err(err) => log.error(format_args!(
            "event=run_import module=service status=error error={err}"
        )),
    }
    outcome
}

fn load_and_store(config: &ImportConfig, log: &dyn LogSink) -> ImportResult<ImportReport> {
    let books = load_books_from_path(&config.input_path, log)?;
    let repo = SqliteBookRepository::open(&config.db_path, log)?;

    let stored = import_books(&repo, &books, log);
    let closed = repo.close();
    let rows = stored?;
    closed?;

    Ok(ImportReport {
        loaded: books.len(),
        rows,
    })
}
