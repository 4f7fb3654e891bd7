//! Fault plan configuration

use domain::RuleDefinition;
use serde::{Deserialize, Serialize};

/// Rules to load at startup and the randomness they are gated with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Seed for a reproducible probability gate (unset = thread RNG)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Rules in registration order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl PlanConfig {
    /// Whether the probability gate is reproducible
    pub const fn is_seeded(&self) -> bool {
        self.seed.is_some()
    }
}
