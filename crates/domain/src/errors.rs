//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Rule name is empty or otherwise unusable
    #[error("Invalid rule name: {0}")]
    InvalidRuleName(String),

    /// Percentage outside of 0..=100
    #[error("Invalid percentage: {0} (expected 0-100)")]
    InvalidPercentage(u32),
}
