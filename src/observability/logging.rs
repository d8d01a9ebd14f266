//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Route output to stderr or an append-only log file
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Level from the command line; `RUST_LOG` overrides when set
//! - File output has ANSI colors disabled

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    Level(String),

    #[error("open log file: {0}")]
    File(#[from] std::io::Error),
}

/// Levels above `error` in the zap naming, which tracing does not have.
const ERROR_ALIASES: [&str; 3] = ["dpanic", "panic", "fatal"];

/// Parse a level name, folding the zap-only severities into `error`.
fn parse_level(level: &str) -> Result<Level, LoggingError> {
    if ERROR_ALIASES.iter().any(|alias| alias.eq_ignore_ascii_case(level)) {
        return Ok(Level::ERROR);
    }
    level
        .parse()
        .map_err(|_| LoggingError::Level(level.to_string()))
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let level = parse_level(level)?;
    let level = level.as_str().to_ascii_lowercase();
    Ok(EnvFilter::new(format!("path_proxy={level},tower_http={level}")))
}

/// Install the global subscriber.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(level)?,
    };
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .init();
        }
        None => registry.with(fmt::layer()).init(),
    }

    Ok(())
}
