//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create the `books` table and upsert flattened rows into it.
//! - Read rows back for post-load verification.
//!
//! # Invariants
//! - Upsert replaces the whole row sharing an id; fields are never merged.
//! - The repository owns its connection; `close` consumes it, so no
//!   operation can run on a closed repository.

use crate::db::schema::BOOKS_TABLE_SQL;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::logging::LogSink;
use crate::model::book::{BookId, BookRecord, BookRow};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    publication_year,
    author_name,
    author_birth_year,
    author_nationality,
    genres,
    goodreads_rating,
    amazon_rating
FROM books";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for schema, write and read operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Writing the row for `id` failed; nothing later in the batch ran.
    Upsert { id: BookId, source: DbError },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Upsert { id, source } => write!(f, "failed to upsert book {id}: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Upsert { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the `books` table.
pub trait BookRepository {
    /// Creates the `books` table when absent; no-op otherwise.
    fn create_schema(&self) -> RepoResult<()>;
    /// Inserts `book` or replaces the row with the same id.
    fn upsert(&self, book: &BookRecord) -> RepoResult<()>;
    /// Returns every row in storage-native order.
    fn fetch_all(&self) -> RepoResult<Vec<BookRow>>;
    fn find_book(&self, id: BookId) -> RepoResult<Option<BookRow>>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'log> {
    conn: Connection,
    log: &'log dyn LogSink,
}

impl<'log> SqliteBookRepository<'log> {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>, log: &'log dyn LogSink) -> RepoResult<Self> {
        let conn = open_db(path, log)?;
        Ok(Self::with_connection(conn, log))
    }

    pub fn open_in_memory(log: &'log dyn LogSink) -> RepoResult<Self> {
        let conn = open_db_in_memory(log)?;
        Ok(Self::with_connection(conn, log))
    }

    /// Wraps an already-open connection.
    pub fn with_connection(conn: Connection, log: &'log dyn LogSink) -> Self {
        Self { conn, log }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the connection.
    ///
    /// On failure the connection is dropped anyway; the error is still
    /// reported so callers can log it.
    pub fn close(self) -> RepoResult<()> {
        match self.conn.close() {
            Ok(()) => {
                self.log
                    .info(format_args!("event=db_close module=repo status=ok"));
                Ok(())
            }
            Err((_conn, err)) => {
                self.log.error(format_args!(
                    "event=db_close module=repo status=error error={err}"
                ));
                Err(err.into())
            }
        }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_schema(&self) -> RepoResult<()> {
        match self.conn.execute_batch(BOOKS_TABLE_SQL) {
            Ok(()) => {
                self.log.info(format_args!(
                    "event=create_schema module=repo status=ok table=books"
                ));
                Ok(())
            }
            Err(err) => {
                self.log.error(format_args!(
                    "event=create_schema module=repo status=error table=books error={err}"
                ));
                Err(err.into())
            }
        }
    }

    fn upsert(&self, book: &BookRecord) -> RepoResult<()> {
        let row = BookRow::from(book);
        let written = self.conn.execute(
            "INSERT OR REPLACE INTO books (
                id,
                title,
                publication_year,
                author_name,
                author_birth_year,
                author_nationality,
                genres,
                goodreads_rating,
                amazon_rating
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                row.id,
                row.title,
                row.publication_year,
                row.author_name,
                row.author_birth_year,
                row.author_nationality,
                row.genres,
                row.goodreads_rating,
                row.amazon_rating,
            ],
        );

        match written {
            Ok(_) => {
                self.log.debug(format_args!(
                    "event=book_upsert module=repo status=ok id={} title={:?} author={:?}",
                    book.id, book.title, book.author.name
                ));
                Ok(())
            }
            Err(err) => {
                self.log.error(format_args!(
                    "event=book_upsert module=repo status=error id={} title={:?} error={}",
                    book.id, book.title, err
                ));
                Err(RepoError::Upsert {
                    id: book.id,
                    source: err.into(),
                })
            }
        }
    }

    fn fetch_all(&self) -> RepoResult<Vec<BookRow>> {
        select_all_rows(&self.conn).map_err(|err| {
            self.log.error(format_args!(
                "event=fetch_all module=repo status=error error={err}"
            ));
            err.into()
        })
    }

    fn find_book(&self, id: BookId) -> RepoResult<Option<BookRow>> {
        let row = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(row)
    }
}

fn select_all_rows(conn: &Connection) -> rusqlite::Result<Vec<BookRow>> {
    let mut stmt = conn.prepare(BOOK_SELECT_SQL)?;
    let rows = stmt.query_map([], parse_book_row)?;
    rows.collect()
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        id: row.get("id")?,
        title: row.get("title")?,
        publication_year: row.get("publication_year")?,
        author_name: row.get("author_name")?,
        author_birth_year: row.get("author_birth_year")?,
        author_nationality: row.get("author_nationality")?,
        genres: row.get("genres")?,
        goodreads_rating: row.get("goodreads_rating")?,
        amazon_rating: row.get("amazon_rating")?,
    })
}
