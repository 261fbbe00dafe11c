//! Structured logging and tracing for hammerqr
//!
//! This module provides logging setup on top of the tracing ecosystem with
//! console and rolling file output, plus a small component-scoped logger.

use crate::config::LoggingConfig;
use crate::error::{HammerError, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, Subscriber, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod level;
mod structured;

pub use level::parse_log_level;
pub use structured::{LogContext, StructuredLogger, get_logger, get_logger_with_context};

/// Setting this variable keeps all output on the console
pub const DISABLE_FILE_LOG_ENV: &str = "HAMMERQR_DISABLE_FILE_LOG";

// Keep the non-blocking worker guard alive for the entire process lifetime
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        let init_result = (|| -> Result<()> {
            let level = parse_log_level(&config.level)?;
            let filter = build_env_filter(level);

            if should_use_console_only() {
                init_console_only_logging(filter, config.json_format, level);
                return Ok(());
            }

            init_file_logging(config, filter, level)
        })();

        if let Err(e) = init_result {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(HammerError::config(err.clone()));
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hammerqr={level},tower_http=warn").into())
}

fn should_use_console_only() -> bool {
    cfg!(test) || std::env::var_os(DISABLE_FILE_LOG_ENV).is_some()
}

/// Plain or JSON formatter for one output, capped at `level`
fn output_layer<S, W>(writer: W, json: bool, level: Level) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);
    let cap = LevelFilter::from_level(level);
    if json {
        base.json().with_filter(cap).boxed()
    } else {
        base.with_filter(cap).boxed()
    }
}

fn init_console_only_logging(filter: EnvFilter, json_format: bool, level: Level) {
    // Several test binaries may race here; the first one wins
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(std::io::stdout, json_format, level))
        .try_init();

    info!("Logging initialized - level: {:?}, console-only", level);
}

/// Directory for the rolling files: the parent of `file` when it names a
/// file, `file` itself otherwise
fn log_directory(file: &str) -> &Path {
    let path = Path::new(file);
    if path.extension().is_some() {
        path.parent().unwrap_or(path)
    } else {
        path
    }
}

fn init_file_logging(config: &LoggingConfig, filter: EnvFilter, level: Level) -> Result<()> {
    let file_appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix("hammerqr")
        .filename_suffix("log")
        .max_log_files(config.backup_count.max(1) as usize)
        .build(log_directory(&config.file))
        .map_err(|e| HammerError::io(format!("Failed to create log file appender: {e}")))?;

    let (writer, guard) = non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let console = config
        .console_output
        .then(|| output_layer(std::io::stdout, config.json_format, level));

    tracing_subscriber::registry()
        .with(filter)
        .with(output_layer(writer, config.json_format, level))
        .with(console)
        .try_init()
        .map_err(|e| HammerError::config(e.to_string()))?;

    info!(
        "Logging initialized - level: {:?}, file: {}",
        level, config.file
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_test_logging() {
        INIT.call_once(|| {
            let config = LoggingConfig::default();
            init_logging(&config).ok();
        });
    }

    #[test]
    fn test_init_is_idempotent() {
        init_test_logging();
        assert!(init_logging(&LoggingConfig::default()).is_ok());
    }

    #[test]
    fn log_directory_of_file_and_dir() {
        assert_eq!(log_directory("/var/log/hammerqr.log"), Path::new("/var/log"));
        assert_eq!(log_directory("/var/log/hammerqr"), Path::new("/var/log/hammerqr"));
    }

    #[test]
    fn test_structured_logger() {
        init_test_logging();

        let logger = get_logger("test_component");

        // These should not panic
        logger.info("Test info message");
        logger.debug("Test debug message");
        logger.warn("Test warning message");
    }
}
