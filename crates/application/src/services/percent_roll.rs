//! Default percent roll backed by the thread-local RNG

use rand::Rng;

use crate::ports::PercentRollPort;

/// Non-deterministic percent roll using `rand::rng()`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngPercentRoll;

impl PercentRollPort for ThreadRngPercentRoll {
    fn roll(&self) -> u8 {
        rand::rng().random_range(0..100)
    }
}
