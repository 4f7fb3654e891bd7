//! Rule definition - serializable description of a rule
//!
//! This is the shape rules take in configuration files and bulk loads. It is
//! converted into a validated [`Rule`](super::Rule) with `Rule::try_from`.

use serde::{Deserialize, Serialize};

/// Unvalidated, serializable form of a fault-injection rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Unique rule name
    pub name: String,

    /// Client address filter (empty = any client)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_addr: String,

    /// Command filter (empty = any command)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,

    /// Delay before the request proceeds, in milliseconds
    #[serde(default, alias = "delay")]
    pub delay_ms: u64,

    /// Error payload returned instead of forwarding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_err: Option<String>,

    /// Reply with an empty value instead of forwarding
    #[serde(default)]
    pub return_empty: bool,

    /// Firing probability 0-100 (0 = always)
    #[serde(default)]
    pub percentage: u32,
}

impl RuleDefinition {
    /// Create a definition with only a name set
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
