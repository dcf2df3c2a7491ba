use std::env;
use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("File system error: {0}")]
    FileSystemError(#[from] std::io::Error),
}

/// Initialize the tracing subscriber with console and optional file output
///
/// Reads `LOG_LEVEL` (default INFO) and `LOG_FILE` from the environment.
/// When a log file is configured, output is duplicated to a daily-rotated
/// file without ANSI codes. This channel also receives the swallowed
/// write-side audit failures, so it must come up before any store is used.
pub fn init_logging() -> Result<(), LoggingError> {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    // EnvFilter is not Clone; validate once, then build one per layer
    let console_filter = EnvFilter::try_new(&level)
        .map_err(|e| LoggingError::InvalidLogLevel(format!("{}: {}", level, e)))?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(console_filter);

    let registry = tracing_subscriber::registry().with(console_layer);

    match env::var("LOG_FILE").ok().map(PathBuf::from) {
        Some(log_file) => {
            let directory = log_file.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_name = log_file
                .file_name()
                .ok_or_else(|| LoggingError::InitializationError("Invalid log file path".to_string()))?;

            let file_appender = tracing_appender::rolling::daily(directory, file_name);

            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new(&level));

            registry
                .with(file_layer)
                .try_init()
                .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
        }
        None => {
            registry
                .try_init()
                .map_err(|e| LoggingError::InitializationError(e.to_string()))?;
        }
    }

    Ok(())
}
