//! DDL and column list for the `books` table.

/// Name of the single table written by the importer.
pub const BOOKS_TABLE: &str = "books";

/// Stored columns in declaration order.
pub const BOOK_COLUMNS: [&str; 9] = [
    "id",
    "title",
    "publication_year",
    "author_name",
    "author_birth_year",
    "author_nationality",
    "genres",
    "goodreads_rating",
    "amazon_rating",
];

pub const BOOKS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    publication_year INTEGER,
    author_name TEXT,
    author_birth_year INTEGER,
    author_nationality TEXT,
    genres TEXT,
    goodreads_rating REAL,
    amazon_rating REAL
);";
