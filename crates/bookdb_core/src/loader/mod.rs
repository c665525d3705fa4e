//! Input document loading.
//!
//! # Responsibility
//! - Turn a `{"books": [...]}` JSON document into ordered [`BookRecord`]s.
//! - Report missing required fields at the parse boundary.
//!
//! # Invariants
//! - Input order is preserved.
//! - Either every record is valid or no record is returned.
//!
//! [`BookRecord`]: crate::model::book::BookRecord

pub mod json_loader;

pub use json_loader::{load_books, load_books_from_path, parse_books, LoadError, LoadResult};
