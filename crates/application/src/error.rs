//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A rule with the same name is already registered
    #[error("Rule already exists: {0}")]
    DuplicateRule(String),

    /// No rule with the given name is registered
    #[error("Rule not found: {0}")]
    RuleNotFound(String),
}

impl ApplicationError {
    /// Check if this error reports a missing rule
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RuleNotFound(_))
    }

    /// Check if this error reports a name clash
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateRule(_))
    }
}
