//! Application configuration
//!
//! Layered with the `config` crate:
//! 1. built-in defaults
//! 2. optional `redfault.toml` (or any format `config` recognises) in the
//!    working directory
//! 3. environment variables such as `REDFAULT_LOGGING__FILTER=debug`
//!
//! Rules are usually declared in the file:
//!
//! ```toml
//! [plan]
//! seed = 42
//!
//! [[plan.rules]]
//! name = "slow_get"
//! command = "GET"
//! delay = 50
//! percentage = 20
//! ```

mod plan;

use std::{collections::HashSet, path::Path};

use domain::{DomainError, Rule};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use plan::PlanConfig;

use crate::telemetry::LoggingConfig;

/// Base name of the optional configuration file
pub const DEFAULT_CONFIG_NAME: &str = "redfault";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "REDFAULT";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A rule definition does not describe a valid rule
    #[error("Invalid rule '{name}': {source}")]
    InvalidRule {
        /// Rule name as written
        name: String,
        /// Validation failure
        #[source]
        source: DomainError,
    },

    /// Two rule definitions share a name
    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Fault plan settings
    #[serde(default)]
    pub plan: PlanConfig,
}

impl AppConfig {
    /// Load configuration from defaults, `redfault.*` if present, and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(
            config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
            Self::environment(),
        )
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_sources(
            config::File::from(path.as_ref()).required(true),
            Self::environment(),
        )
    }

    /// Parse configuration from a TOML document, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("logging.filter", "info")?
            .set_default("logging.format", "text")?)
    }

    /// `REDFAULT_<SECTION>__<KEY>` variables, e.g. `REDFAULT_PLAN__SEED=7`
    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources<S>(file: S, env: config::Environment) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Self::defaults()?
            .add_source(file)
            .add_source(env)
            .build()?;

        let app: Self = config.try_deserialize()?;
        debug!(rules = app.plan.rules.len(), "Configuration loaded");
        Ok(app)
    }

    /// Check every rule definition before anything is built from them
    ///
    /// # Errors
    ///
    /// Returns the first invalid or duplicated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for definition in &self.plan.rules {
            let rule = Rule::try_from(definition.clone()).map_err(|source| {
                ConfigError::InvalidRule {
                    name: definition.name.clone(),
                    source,
                }
            })?;

            if !seen.insert(rule.name().to_string()) {
                return Err(ConfigError::DuplicateRule(rule.name().to_string()));
            }
        }
        Ok(())
    }
}
