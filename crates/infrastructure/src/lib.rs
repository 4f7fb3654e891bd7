//! Infrastructure layer - Adapters and runtime wiring
//!
//! Loads configuration, installs logging, supplies the seeded random source
//! for the probability gate, and applies selected rules to intercepted
//! requests on behalf of the proxy.

pub mod adapters;
pub mod bootstrap;
pub mod chaos;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::{BootstrapError, build_injector, build_plan};
pub use chaos::{ChaosStats, FaultInjector, FaultInjectorConfig, InterceptDecision};
pub use config::{AppConfig, ConfigError, PlanConfig};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
