//! Injected logging interface.
//!
//! # Responsibility
//! - Give loader, db, repository and service code a leveled logging handle
//!   passed in by the caller.
//! - Forward events to the `log` facade in production.
//!
//! # Invariants
//! - Logging is fire-and-forget; sinks never report failures to callers.

use log::Level;
use std::fmt::Arguments;

/// Default target attached to events emitted through [`FacadeLog`].
pub const DEFAULT_LOG_TARGET: &str = "bookdb";

/// Leveled logging handle accepted by core components.
pub trait LogSink {
    fn log(&self, level: Level, args: Arguments<'_>);

    fn debug(&self, args: Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn info(&self, args: Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn error(&self, args: Arguments<'_>) {
        self.log(Level::Error, args);
    }
}

/// [`LogSink`] that writes through the process `log` facade.
///
/// Events are dropped silently when no backend is installed, which keeps
/// tests and library callers free of logging setup.
#[derive(Debug, Clone, Copy)]
pub struct FacadeLog {
    target: &'static str,
}

impl FacadeLog {
    pub const fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for FacadeLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_TARGET)
    }
}

impl LogSink for FacadeLog {
    fn log(&self, level: Level, args: Arguments<'_>) {
        log::log!(target: self.target, level, "{}", args);
    }
}
