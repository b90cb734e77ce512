//! Tracing setup for the binary.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::ConfigError;

/// Console logging, plus daily-rotated JSON files when `log_dir` is set.
///
/// Call once, at startup. Keep the returned guard alive until exit so
/// buffered file logs flush.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, ConfigError> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(default_filter());

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(console_layer).init();
        return Ok(None);
    };

    fs::create_dir_all(log_dir)?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "meditate-core.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .json()
        .with_filter(default_filter());

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    tracing::info!(log_dir = %log_dir.display(), "Logging initialized with file output");

    Ok(Some(guard))
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
