//! File-backed logging bootstrap.
//!
//! The TUI owns stdout while it runs, so log records always go to a rotating
//! file under the configured directory, never to the terminal.
//!
//! # Invariants
//! - Initialization happens at most once per process.
//! - Re-initialization with the same settings is a no-op; different settings are rejected.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

use crate::error::AppError;

const LOG_FILE_BASENAME: &str = "mmm";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Start file logging at `level` under `log_dir`.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), AppError> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return check_same(state, level, log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, AppError> {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            AppError::new(2, format!("Failed to create log directory '{}': {e}", log_dir.display()))
        })?;

        let logger = Logger::try_with_str(level)
            .map_err(|e| AppError::new(2, format!("Invalid log level '{level}': {e}")))?
            .log_to_file(FileSpec::default().directory(log_dir).basename(LOG_FILE_BASENAME))
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|e| AppError::new(4, format!("Failed to start logger: {e}")))?;

        info!(
            "event=app_start version={} level={level} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            log_dir.display()
        );

        Ok(LoggingState {
            level,
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    check_same(state, level, log_dir)
}

/// Default log directory: `<tmp>/mmm-dashboard/logs`.
pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("mmm-dashboard").join("logs")
}

fn check_same(state: &LoggingState, level: &str, log_dir: &Path) -> Result<(), AppError> {
    if state.log_dir != log_dir || state.level != level {
        return Err(AppError::new(
            2,
            format!(
                "Logging already initialized ({} at '{}'); refusing to switch to {level} at '{}'.",
                state.level,
                state.log_dir.display(),
                log_dir.display()
            ),
        ));
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(AppError::new(
            2,
            format!("Unsupported log level '{other}'; expected trace|debug|info|warn|error|off."),
        )),
    }
}
