//! Percentage value object
//!
//! Firing probability of a rule, as a whole percentage (0-100).
//!
//! `0` is the unset/default value and means the rule is not gated at all:
//! once its predicates match it always fires. There is no way to express
//! "never fire" through this type.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Percentage;
//!
//! let p = Percentage::new(20).expect("valid percentage");
//! assert_eq!(p.value(), 20);
//! assert!(!p.is_ungated());
//!
//! assert!(Percentage::default().is_ungated());
//! assert!(Percentage::new(101).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Whole-number firing probability (0-100)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Percentage(u8);

impl Percentage {
    /// Maximum valid percentage
    pub const MAX: u8 = 100;

    /// Always fire (same behaviour as the unset value)
    pub const ALWAYS: Self = Self(Self::MAX);

    /// Create a new validated percentage
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPercentage` if the value is greater than 100.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(DomainError::InvalidPercentage(value))
    }

    /// Get the percentage as a u8
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether this percentage disables probabilistic gating entirely
    #[must_use]
    pub const fn is_ungated(self) -> bool {
        self.0 == 0
    }

    /// Decide whether the gate opens for a draw in `[0, 99]`
    ///
    /// An ungated percentage opens for every draw.
    #[must_use]
    pub const fn admits(self, draw: u8) -> bool {
        self.is_ungated() || draw < self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u32> for Percentage {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

/// Custom deserialization that validates the range
impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_full_range() {
        assert!(Percentage::new(0).is_ok());
        assert!(Percentage::new(50).is_ok());
        assert!(Percentage::new(100).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(matches!(
            Percentage::new(101),
            Err(DomainError::InvalidPercentage(101))
        ));
        assert!(matches!(
            Percentage::new(100_000),
            Err(DomainError::InvalidPercentage(100_000))
        ));
    }

    #[test]
    fn zero_is_ungated() {
        let p = Percentage::default();
        assert!(p.is_ungated());
        for draw in 0..100 {
            assert!(p.admits(draw));
        }
    }

    #[test]
    fn hundred_admits_every_draw() {
        for draw in 0..100 {
            assert!(Percentage::ALWAYS.admits(draw));
        }
    }

    #[test]
    fn admits_is_strictly_less_than() {
        let p = Percentage::new(20).unwrap();
        assert!(p.admits(0));
        assert!(p.admits(19));
        assert!(!p.admits(20));
        assert!(!p.admits(99));
    }

    #[test]
    fn one_percent_admits_only_zero() {
        let p = Percentage::new(1).unwrap();
        assert!(p.admits(0));
        assert!(!p.admits(1));
    }

    #[test]
    fn display_has_percent_sign() {
        assert_eq!(Percentage::new(65).unwrap().to_string(), "65%");
    }

    #[test]
    fn deserialize_validates() {
        let ok: Percentage = serde_json::from_str("42").unwrap();
        assert_eq!(ok.value(), 42);

        let err = serde_json::from_str::<Percentage>("250");
        assert!(err.is_err());
    }
}
