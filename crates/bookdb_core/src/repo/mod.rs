//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract used by the import service.
//! - Isolate SQLite query details from orchestration.
//!
//! # Invariants
//! - Writes are insert-or-replace keyed by book id.
//! - Every write is committed before the call returns.

pub mod book_repo;
