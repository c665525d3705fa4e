//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection settings required by the importer.
//!
//! # Invariants
//! - Parent directories of a file database exist before opening.
//! - Returned connections wait up to 5s on a locked database.

use super::{DbError, DbResult};
use crate::logging::LogSink;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file.
///
/// # Side effects
/// - Creates missing parent directories of `path`.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, log: &dyn LogSink) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    log.info(format_args!(
        "event=db_open module=db status=start mode=file path={}",
        path.display()
    ));

    let opened = ensure_parent_dir(path).and_then(|()| {
        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        Ok(conn)
    });

    finish_open(opened, "file", started_at, log)
}

/// Opens an in-memory SQLite database.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory(log: &dyn LogSink) -> DbResult<Connection> {
    let started_at = Instant::now();
    log.info(format_args!(
        "event=db_open module=db status=start mode=memory"
    ));

    let opened = Connection::open_in_memory()
        .map_err(DbError::from)
        .and_then(|conn| {
            configure_connection(&conn)?;
            Ok(conn)
        });

    finish_open(opened, "memory", started_at, log)
}

fn finish_open(
    opened: DbResult<Connection>,
    mode: &str,
    started_at: Instant,
    log: &dyn LogSink,
) -> DbResult<Connection> {
    match opened {
        Ok(conn) => {
            log.info(format_args!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            ));
            Ok(conn)
        }
        Err(err) => {
            log.error(format_args!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            ));
            Err(err)
        }
    }
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
