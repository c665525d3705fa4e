//! Book record and persisted row projection.
//!
//! # Responsibility
//! - Carry one parsed book through the import pipeline.
//! - Flatten nested author/ratings data into the stored column shape.
//!
//! # Invariants
//! - Genre order survives the flatten/split round trip.
//! - Optional input fields stay `None`; they are never defaulted to zero.

/// Primary key of the `books` table.
pub type BookId = i64;

/// Separator used to store the ordered genre list in one text column.
pub const GENRE_SEPARATOR: char = ',';

/// Author metadata nested inside a book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub birth_year: Option<i64>,
    pub nationality: Option<String>,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_year: None,
            nationality: None,
        }
    }
}

/// Third-party ratings; each source may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ratings {
    pub goodreads: Option<f64>,
    pub amazon: Option<f64>,
}

/// In-memory representation of one book parsed from the input document.
///
/// Instances are transient: they are handed to the repository and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub publication_year: Option<i64>,
    pub author: Author,
    /// Ordered labels, stored comma-joined.
    ///
    /// A label containing `,` is split into several labels when the stored
    /// row is read back through [`BookRow::genre_list`].
    pub genres: Vec<String>,
    pub ratings: Ratings,
}

impl BookRecord {
    /// Creates a record with no genres and no optional metadata.
    pub fn new(id: BookId, title: impl Into<String>, author: Author) -> Self {
        Self {
            id,
            title: title.into(),
            publication_year: None,
            author,
            genres: Vec::new(),
            ratings: Ratings::default(),
        }
    }

    /// Returns genres in the single-column stored form.
    pub fn joined_genres(&self) -> String {
        self.genres.join(&GENRE_SEPARATOR.to_string())
    }
}

/// Flattened, stored form of a [`BookRecord`].
///
/// Field order matches the column order of the `books` table.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub publication_year: Option<i64>,
    pub author_name: Option<String>,
    pub author_birth_year: Option<i64>,
    pub author_nationality: Option<String>,
    pub genres: Option<String>,
    pub goodreads_rating: Option<f64>,
    pub amazon_rating: Option<f64>,
}

impl BookRow {
    /// Splits the stored genre column back into the ordered list.
    ///
    /// An empty or NULL column yields an empty list. Labels that contained
    /// `,` on write come back as separate labels.
    pub fn genre_list(&self) -> Vec<String> {
        match self.genres.as_deref() {
            None | Some("") => Vec::new(),
            Some(joined) => joined.split(GENRE_SEPARATOR).map(str::to_string).collect(),
        }
    }
}

impl From<&BookRecord> for BookRow {
    fn from(book: &BookRecord) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            publication_year: book.publication_year,
            author_name: Some(book.author.name.clone()),
            author_birth_year: book.author.birth_year,
            author_nationality: book.author.nationality.clone(),
            genres: Some(book.joined_genres()),
            goodreads_rating: book.ratings.goodreads,
            amazon_rating: book.ratings.amazon,
        }
    }
}
