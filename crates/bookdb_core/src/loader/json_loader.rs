//! JSON loader for book documents.
//!
//! # Responsibility
//! - Read the whole input and decode it with an explicit serde schema.
//! - Convert the loosely typed wire shape into validated domain records.
//!
//! # Invariants
//! - Required fields absent or `null` surface as `MissingField`.
//! - Optional fields absent or `null` become `None`.

use crate::logging::LogSink;
use crate::model::book::{Author, BookId, BookRecord, Ratings};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::{Path, PathBuf};

pub type LoadResult<T> = Result<T, LoadError>;

/// Loader error for input access, JSON decoding and required fields.
#[derive(Debug)]
pub enum LoadError {
    /// The input file does not exist.
    NotFound(PathBuf),
    Io {
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// Input is not valid JSON or a value has the wrong type.
    Parse(serde_json::Error),
    /// A required field is absent or `null`.
    MissingField {
        /// Zero-based position in the `books` array; `None` for document level.
        index: Option<usize>,
        id: Option<BookId>,
        /// Dotted field path, e.g. `author.name`.
        field: &'static str,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "input file not found: {}", path.display()),
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "failed to read `{}`: {source}", path.display()),
            Self::Io { path: None, source } => write!(f, "failed to read input: {source}"),
            Self::Parse(err) => write!(f, "invalid JSON document: {err}"),
            Self::MissingField {
                index: None, field, ..
            } => write!(f, "document is missing required field `{field}`"),
            Self::MissingField {
                index: Some(index),
                id: Some(id),
                field,
            } => write!(
                f,
                "book #{index} (id {id}) is missing required field `{field}`"
            ),
            Self::MissingField {
                index: Some(index),
                id: None,
                field,
            } => write!(f, "book #{index} is missing required field `{field}`"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::MissingField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

// Wire shape: every field is optional so presence can be checked explicitly
// instead of relying on serde's generic "missing field" error.
#[derive(Debug, Deserialize)]
struct WireDocument {
    books: Option<Vec<WireBook>>,
}

#[derive(Debug, Deserialize)]
struct WireBook {
    id: Option<BookId>,
    title: Option<String>,
    publication_year: Option<i64>,
    author: Option<WireAuthor>,
    genres: Option<Vec<String>>,
    ratings: Option<WireRatings>,
}

#[derive(Debug, Deserialize)]
struct WireAuthor {
    name: Option<String>,
    birth_year: Option<i64>,
    nationality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireRatings {
    goodreads: Option<f64>,
    amazon: Option<f64>,
}

impl WireBook {
    fn into_record(self, index: usize) -> LoadResult<BookRecord> {
        let id = self.id;
        let missing = move |field: &'static str| LoadError::MissingField {
            index: Some(index),
            id,
            field,
        };

        let id = id.ok_or_else(|| missing("id"))?;
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| missing("title"))?;
        let author = self.author.ok_or_else(|| missing("author"))?;
        let name = author.name.ok_or_else(|| missing("author.name"))?;
        let genres = self.genres.ok_or_else(|| missing("genres"))?;
        let ratings = self.ratings.ok_or_else(|| missing("ratings"))?;

        Ok(BookRecord {
            id,
            title,
            publication_year: self.publication_year,
            author: Author {
                name,
                birth_year: author.birth_year,
                nationality: author.nationality,
            },
            genres,
            ratings: Ratings {
                goodreads: ratings.goodreads,
                amazon: ratings.amazon,
            },
        })
    }
}

/// Decodes a complete JSON document into ordered book records.
///
/// # Errors
/// - `Parse` when the bytes are not valid JSON or a value has the wrong type.
/// - `MissingField` for the first record lacking a required field.
pub fn parse_books(bytes: &[u8]) -> LoadResult<Vec<BookRecord>> {
    let document: WireDocument = serde_json::from_slice(bytes)?;
    let books = document.books.ok_or(LoadError::MissingField {
        index: None,
        id: None,
        field: "books",
    })?;

    books
        .into_iter()
        .enumerate()
        .map(|(index, book)| book.into_record(index))
        .collect()
}

/// Reads the whole stream and decodes it with [`parse_books`].
pub fn load_books(mut reader: impl Read, log: &dyn LogSink) -> LoadResult<Vec<BookRecord>> {
    let mut bytes = Vec::new();
    if let Err(source) = reader.read_to_end(&mut bytes) {
        let err = LoadError::Io { path: None, source };
        log.error(format_args!(
            "event=books_load module=loader status=error error={err}"
        ));
        return Err(err);
    }
    decode_logged(&bytes, log)
}

/// Opens `path` and loads every book it contains.
///
/// # Errors
/// - `NotFound` when `path` does not exist.
/// - Any error from [`parse_books`].
pub fn load_books_from_path(
    path: impl AsRef<Path>,
    log: &dyn LogSink,
) -> LoadResult<Vec<BookRecord>> {
    let path = path.as_ref();
    log.info(format_args!(
        "event=books_load module=loader status=start path={}",
        path.display()
    ));

    let bytes = std::fs::read(path).map_err(|source| {
        let err = if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: Some(path.to_path_buf()),
                source,
            }
        };
        log.error(format_args!(
            "event=books_load module=loader status=error path={} error={err}",
            path.display()
        ));
        err
    })?;

    decode_logged(&bytes, log)
}

fn decode_logged(bytes: &[u8], log: &dyn LogSink) -> LoadResult<Vec<BookRecord>> {
    match parse_books(bytes) {
        Ok(books) => {
            log.info(format_args!(
                "event=books_load module=loader status=ok count={}",
                books.len()
            ));
            Ok(books)
        }
        Err(err) => {
            log.error(format_args!(
                "event=books_load module=loader status=error error={err}"
            ));
            Err(err)
        }
    }
}
