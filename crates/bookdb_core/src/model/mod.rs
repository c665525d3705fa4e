//! Book domain model.
//!
//! # Responsibility
//! - Define the nested record parsed from input documents.
//! - Define the flat nine-column row persisted in `books`.
//!
//! # Invariants
//! - Every book is identified by a stable integer `BookId`.
//! - A persisted row is a full projection of one record, never a merge.

pub mod book;
