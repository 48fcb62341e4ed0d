//! Tracing subscriber setup.

use anyhow::{Context, Result};
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::domain::models::{LogFormat, LoggingConfig, RotationPolicy};

const LOG_FILE_PREFIX: &str = "paintquest.log";

/// Logger implementation using tracing
pub struct LoggerImpl {
    _guard: Option<WorkerGuard>,
}

impl LoggerImpl {
    /// Install the global subscriber.
    ///
    /// `RUST_LOG` directives take precedence over the configured level.
    /// Fails if a global subscriber is already set.
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let default_level = parse_log_level(&config.level)?;
        let env_filter = EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy();

        let stderr_json = (config.format == LogFormat::Json).then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_target(true)
        });
        let stderr_pretty = (config.format == LogFormat::Pretty).then(|| {
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false)
        });

        let (file_layer, guard) = match config.log_dir {
            Some(ref log_dir) => {
                // File output is always JSON for structured logging
                let appender = match config.rotation {
                    RotationPolicy::Daily => rolling::daily(log_dir, LOG_FILE_PREFIX),
                    RotationPolicy::Hourly => rolling::hourly(log_dir, LOG_FILE_PREFIX),
                    RotationPolicy::Never => rolling::never(log_dir, LOG_FILE_PREFIX),
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_json)
            .with(stderr_pretty)
            .with(file_layer)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        tracing::debug!(
            level = %config.level,
            format = ?config.format,
            file_output = config.log_dir.is_some(),
            "logger initialized"
        );

        Ok(Self { _guard: guard })
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
