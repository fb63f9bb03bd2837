//! File logging through tracing.
//!
//! The TUI owns the terminal, so log output goes to daily-rolling files.
//! `RUST_LOG` overrides the default filter.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "stocksense.log";

/// Default directory for log files.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("stocksense").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Install the global subscriber. Keep the returned guard alive until
/// exit so buffered lines are flushed.
pub fn init(log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_filter = if verbose {
        "stocksense=debug,info"
    } else {
        "stocksense=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .try_init()
        .context("Failed to install log subscriber")?;

    info!(log_dir = %log_dir.display(), "logging initialised");
    Ok(guard)
}
