//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber used by every layer.

mod subscriber;

pub use subscriber::{LogFormat, LoggingConfig, TelemetryError, init_logging};
