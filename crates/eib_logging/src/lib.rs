//! Shared logging setup for EIB binaries.
//!
//! Stdout carries JSON-RPC traffic, so nothing here ever writes to it: logs go
//! to stderr and, optionally, to a daily-rolling file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "eib=info,eib_mcp=info,eib_config=info";
const VERBOSE_LOG_FILTER: &str = "eib=debug,eib_mcp=debug,eib_config=debug";

/// Logging configuration shared by EIB binaries.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub verbose: bool,
    /// Also write logs to `<log_dir>/<app_name>.log.<date>`.
    pub log_dir: Option<&'a Path>,
}

/// Keeps the background file writer alive; drop it last.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize tracing with stderr output and an optional rolling file.
///
/// `RUST_LOG` takes precedence over both defaults.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let filter = log_filter(config.verbose);

    let (file_layer, guard) = match config.log_dir {
        Some(dir) => {
            let dir = ensure_log_dir(dir)?;
            let appender =
                tracing_appender::rolling::daily(dir, format!("{}.log", sanitize_name(config.app_name)));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter.clone());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    })
}

/// Ensure the log directory exists.
pub fn ensure_log_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
