//! Core logic for the bookdb batch importer.
//! Loads a JSON book collection and upserts it into a SQLite `books` table.

pub mod db;
pub mod loader;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use loader::{load_books, load_books_from_path, parse_books, LoadError, LoadResult};
pub use logging::{default_log_level, init_logging, FacadeLog, LogSink, LoggingHandle};
pub use model::book::{Author, BookId, BookRecord, BookRow, Ratings};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::import_service::{
    import_books, run_import, ImportConfig, ImportError, ImportReport, ImportResult,
};
