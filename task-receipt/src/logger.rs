//! Logging Infrastructure
//!
//! Console logging to stderr (stdout is kept for previews and reports),
//! plus optional daily rotating JSON log files.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Log file name prefix: `task-receipt.YYYY-MM-DD.log`
pub const LOG_FILE_PREFIX: &str = "task-receipt";
const LOG_FILE_SUFFIX: &str = "log";
/// Rotated log files older than this are deleted at startup
pub const LOG_RETENTION_DAYS: u64 = 14;

/// Delete rotated log files older than `days`
///
/// Only files named `task-receipt.YYYY-MM-DD.log` are considered. Returns
/// the number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, days: u64) -> anyhow::Result<usize> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let Some(cutoff) = Local::now()
        .date_naive()
        .checked_sub_days(chrono::Days::new(days))
    else {
        return Ok(0);
    };

    let mut removed = 0;
    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(date_part) = name
            .strip_prefix(LOG_FILE_PREFIX)
            .and_then(|d| d.strip_prefix('.'))
            .and_then(|d| d.strip_suffix(LOG_FILE_SUFFIX))
            .and_then(|d| d.strip_suffix('.'))
            && let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins if set
/// * `json_format` - JSON console output instead of the human-readable format
/// * `log_dir` - Optional directory for daily rotating JSON log files
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(dir)?;

            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = log_dir {
        cleanup_old_logs(dir, LOG_RETENTION_DAYS)?;
    }

    Ok(())
}

/// Console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}
