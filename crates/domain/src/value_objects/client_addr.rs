//! Client address filter value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Client address predicate of a rule
///
/// An empty filter matches every client. Otherwise the observed address must
/// be a prefix of (or equal to) the configured one, so `"192.0.0.1:8001"`
/// matches a peer reported as `"192.0.0.1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientAddrFilter(String);

impl ClientAddrFilter {
    /// Filter that matches every client
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter for a configured address, optionally carrying a port
    pub fn new(addr: impl AsRef<str>) -> Self {
        Self(addr.as_ref().trim().to_string())
    }

    /// Whether the filter accepts every client
    pub fn is_any(&self) -> bool {
        self.0.is_empty()
    }

    /// The configured address
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check an observed client address against this filter
    pub fn matches(&self, observed: &str) -> bool {
        self.is_any() || self.0.starts_with(observed)
    }
}

impl fmt::Display for ClientAddrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str("*")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for ClientAddrFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}
