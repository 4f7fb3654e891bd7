//! `tracing-subscriber` setup
//!
//! The filter comes from `RUST_LOG` when it is set and parses, otherwise from
//! [`LoggingConfig::filter`]. Output is human-readable text or one JSON object
//! per line.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Newline-delimited JSON
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is unset (e.g. "info,application=debug")
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// Include the event target (module path)
    #[serde(default = "default_true")]
    pub with_target: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
            with_target: true,
        }
    }
}

/// Logging initialization errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directives do not parse
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter {
        /// Offending directives
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Pick the filter: a parseable `RUST_LOG` wins over the configured one
fn build_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }

    EnvFilter::try_new(configured).map_err(|e| TelemetryError::Filter {
        filter: configured.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns `TelemetryError::Filter` for unparseable directives and
/// `TelemetryError::Init` when called more than once per process.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env.as_deref(), &config.filter)?;

    let (json_layer, text_layer) = match config.format {
        LogFormat::Json => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(config.with_target)
                    .with_current_span(true),
            ),
            None,
        ),
        LogFormat::Text => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(config.with_target)
                    .with_thread_ids(true),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = ?config.format, "Logging initialized");
    Ok(())
}
