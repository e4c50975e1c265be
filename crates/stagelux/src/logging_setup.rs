use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Logging configuration for the engine process.
pub struct LogConfig {
    /// Default level when RUST_LOG is unset.
    pub level: String,
    /// Mirror logs to stderr.
    pub console_output: bool,
    /// Write logs to a file (non-blocking).
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            log_file: None,
        }
    }
}

/// Handle to keep the logging worker thread alive
pub struct LogGuard {
    // Kept alive until dropped
    _guard: WorkerGuard,
}

/// Initialize the logging system
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    // RUST_LOG env var takes precedence over the configured level.
    let filter = |level: &str| {
        EnvFilter::builder()
            .with_default_directive(level.parse().unwrap_or_else(|_| tracing::Level::INFO.into()))
            .from_env_lossy()
    };

    let console_layer = if config.console_output {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr) // stderr for logs, stdout for CLI output
                .with_ansi(true)
                .with_target(false)
                .with_filter(filter(&config.level)),
        )
    } else {
        None
    };

    let (file_layer, guard) = if let Some(log_path) = &config.log_file {
        let file = File::create(log_path)
            .with_context(|| format!("Failed to create log file: {log_path:?}"))?;

        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file);

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // no colors in file
            .with_filter(filter(&config.level));

        (
            Some(layer),
            Some(LogGuard {
                _guard: worker_guard,
            }),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized at level: {}", config.level);

    Ok(guard)
}
