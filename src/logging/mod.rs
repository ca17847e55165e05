//! File logging
//!
//! The terminal belongs to the UI, so every event goes to a log file.
//! The path template may contain a {date} placeholder.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize logging based on configuration.
///
/// Returns the resolved log file path, or None when logging is disabled.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let level = parse_log_level(&config.level)?;
    let log_path = resolve_log_path(&config.file, Local::now().date_naive());

    let log_dir = log_path
        .parent()
        .context("Invalid log file path")?
        .to_path_buf();
    let log_filename = log_path
        .file_name()
        .context("Invalid log filename")?
        .to_str()
        .context("Invalid UTF-8 in log filename")?;

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_filename)
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        log_file = %log_path.display(),
        level = %level,
        version = env!("CARGO_PKG_VERSION"),
        "Logging initialized"
    );

    Ok(Some(log_path))
}

/// Substitute {date} in the path template
fn resolve_log_path(template: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(template.replace("{date}", &date.format("%Y-%m-%d").to_string()))
}

/// Parse log level string into tracing::Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {}", level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("DEBUG"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("warning"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_resolve_log_path() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
        assert_eq!(
            resolve_log_path("/tmp/kamo-{date}.log", date),
            PathBuf::from("/tmp/kamo-2024-04-08.log")
        );
        assert_eq!(
            resolve_log_path("/var/log/kamo.log", date),
            PathBuf::from("/var/log/kamo.log")
        );
    }

    #[test]
    fn test_disabled_logging_is_noop() {
        let config = LoggingConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).unwrap().is_none());
    }
}
