//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate loader and repository calls into one batch import.
//! - Keep the CLI decoupled from storage details.

pub mod import_service;
