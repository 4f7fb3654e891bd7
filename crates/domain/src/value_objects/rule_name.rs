//! Rule name value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Human-readable identifier of a rule, unique within a plan
///
/// Surrounding whitespace is stripped; the remainder must not be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RuleName(String);

impl RuleName {
    /// Create a validated rule name
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRuleName(
                "name must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RuleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<'de> Deserialize<'de> for RuleName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name_is_kept() {
        let name = RuleName::new("clients_delay").unwrap();
        assert_eq!(name.as_str(), "clients_delay");
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let name = RuleName::new("  Invalid Key \t").unwrap();
        assert_eq!(name.as_str(), "Invalid Key");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            RuleName::new(""),
            Err(DomainError::InvalidRuleName(_))
        ));
        assert!(RuleName::new("   ").is_err());
    }

    #[test]
    fn compares_with_str() {
        let name = RuleName::new("k1").unwrap();
        assert!(name == *"k1");
    }

    #[test]
    fn deserialize_rejects_blank() {
        assert!(serde_json::from_str::<RuleName>("\"  \"").is_err());
        let name: RuleName = serde_json::from_str("\"k1\"").unwrap();
        assert_eq!(name.to_string(), "k1");
    }
}
