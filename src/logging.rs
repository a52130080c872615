//! Logging setup for blogd.
//!
//! Console output always; a plain-text log file in addition when
//! `logging.file` is set. `RUST_LOG` directives are layered on top of the
//! configured level.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{BlogError, Result};

/// Configured log level.
///
/// Accepts the usual tracing names plus `warning` and `fatal`, case
/// insensitive. `fatal` maps to error since tracing has nothing above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = BlogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "fatal" => Ok(Self::Error),
            other => Err(BlogError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Build the filter for `level`.
///
/// sqlx logs every statement at debug, which drowns the request traces, so
/// it is held at warn unless `RUST_LOG` says otherwise.
fn build_filter(level: LogLevel) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();

    match "sqlx=warn".parse() {
        Ok(directive) if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() => {
            filter.add_directive(directive)
        }
        _ => filter,
    }
}

/// Directory that has to exist before `path` can be created, if any.
fn log_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Open the log file for appending, creating missing directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = log_dir(path) {
        fs::create_dir_all(dir)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber described by `config`.
///
/// Fails on an unknown level, an unwritable log file, or when a subscriber
/// is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level: LogLevel = config.level.parse()?;

    let file_layer = match config.file.as_deref() {
        Some(path) => {
            let file = Arc::new(open_log_file(Path::new(path))?);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(file_layer)
        .with(build_filter(level))
        .try_init()
        .map_err(|e| BlogError::Config(format!("logging already initialized: {e}")))
}

/// Console-only logging, used when [`init`] fails.
///
/// An unknown level falls back to info.
pub fn init_console_only(level: &str) {
    let level = level.parse().unwrap_or(LogLevel::Info);

    // Ignored: a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true),
        )
        .with(build_filter(level))
        .try_init();
}
