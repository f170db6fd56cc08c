//! # Logging Setup
//!
//! Structured logging with the `tracing` crate, supporting:
//! - Pretty, compact, and JSON output formats
//! - Module-level filtering via `RUST_LOG` or an explicit filter string
//!
//! ## Usage
//!
//! ```ignore
//! use player_core::logging::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig::default())?;
//! tracing::info!("player core started");
//! ```

use std::io;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact format for production
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Custom filter string (e.g., "player_core=debug,player_bridge=trace").
    /// Falls back to `RUST_LOG`, then to "info".
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Set log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set custom filter string
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Initialize the logging system.
///
/// Should be called once during application startup.
///
/// # Errors
///
/// Returns a descriptive message when the filter string is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), String> {
    let filter = match &config.filter {
        Some(custom) => {
            EnvFilter::try_new(custom).map_err(|e| format!("Invalid log filter: {e}"))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stdout);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    result.map_err(|e| format!("Failed to initialize logging: {e}"))
}
