//! File-backed logging.
//!
//! The terminal UI owns stdout, so log records go to rotating files under
//! `<data-dir>/logs`. Records are `key=value` formatted, for example
//! `event=session_commit status=ok task=... seconds=...`.
//!
//! Initialization is idempotent for the same directory and level, and never
//! panics; a second call with different settings is rejected.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "levelup";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .find(|&&l| l == wanted)
        .copied()
        .ok_or_else(|| format!("unsupported log level `{}` (expected one of {})", level, LEVELS.join(", ")))
}

pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|err| format!("failed to create log directory `{}`: {err}", log_dir.display()))?;

        let logger = Logger::try_with_str(level)
            .map_err(|err| format!("invalid log level `{level}`: {err}"))?
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
            .map_err(|err| format!("failed to start logger: {err}"))?;

        info!(
            "event=app_start status=ok version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState { level, log_dir: log_dir.to_path_buf(), _logger: logger })
    })?;

    if state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }

    Ok(())
}
