//! Core logging bootstrap and injected sink.
//!
//! # Responsibility
//! - Start the file-based logging backend once per run.
//! - Hand callers an explicit [`LogSink`] instead of a hidden logger object.
//!
//! # Invariants
//! - Logging initialization must not panic.
//! - Each run writes to its own timestamped file under the log directory.
//! - A second initialization in the same process is rejected.

mod sink;

pub use sink::{FacadeLog, LogSink, DEFAULT_LOG_TARGET};

use flexi_logger::{FileSpec, Logger, LoggerHandle, WriteMode};
use log::{error, info};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "book_db";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

/// Active logging backend for one batch run.
///
/// Dropping the handle flushes buffered records and stops the backend, so
/// callers keep it alive until the run is over.
pub struct LoggingHandle {
    level: &'static str,
    log_dir: PathBuf,
    logger: LoggerHandle,
}

impl LoggingHandle {
    /// Normalized level the backend was started with.
    pub fn level(&self) -> &'static str {
        self.level
    }

    /// Absolute directory receiving log files.
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Returns the sink to inject into core components.
    pub fn sink(&self) -> FacadeLog {
        FacadeLog::default()
    }

    /// Flushes buffered records to the log file.
    pub fn flush(&self) {
        self.logger.flush();
    }
}

/// Initializes core logging with level and directory.
///
/// Relative `log_dir` values are resolved against the current directory.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when `log_dir` is empty or cannot be created.
/// - Returns an error when logger backend setup fails, including when a
///   logger is already installed in this process.
pub fn init_logging(level: &str, log_dir: &str) -> Result<LoggingHandle, String> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    std::fs::create_dir_all(&log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            log_dir.display()
        )
    })?;

    let logger = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX)
                .use_timestamp(true),
        )
        .write_mode(WriteMode::BufferAndFlush)
        // Format: [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=app_start module=core status=ok platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=core_init module=core status=ok level={} log_dir={}",
        level,
        log_dir.display()
    );

    Ok(LoggingHandle {
        level,
        log_dir,
        logger,
    })
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|err| format!("cannot resolve relative log_dir `{trimmed}`: {err}"))?;
    Ok(cwd.join(path))
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

// Only reached after the backend started, which happens at most once per
// process, so the hook is never stacked twice.
fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
