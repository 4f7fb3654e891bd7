//! Percent roll port
//!
//! Source of randomness for the probability gate. Called on the request hot
//! path, so implementations must be cheap and must not block.

#[cfg(test)]
use mockall::automock;

/// Uniform draw used to decide whether a matched rule fires
#[cfg_attr(test, automock)]
pub trait PercentRollPort: Send + Sync + std::fmt::Debug {
    /// Draw a uniformly distributed integer in `[0, 99]`
    fn roll(&self) -> u8;
}
