//! Reproducible percent roll
//!
//! Draws from a `StdRng` seeded once at construction, so a plan built from the
//! same configuration fires the same sequence of gated rules. The generator
//! sits behind a mutex; concurrent callers still see one shared sequence, just
//! interleaved in whatever order they reach it.

use application::ports::PercentRollPort;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Percent roll backed by a seeded `StdRng`
pub struct SeededPercentRoll {
    seed: u64,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for SeededPercentRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededPercentRoll")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl SeededPercentRoll {
    /// Create a roll whose draws are fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// The seed this roll was created with
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl PercentRollPort for SeededPercentRoll {
    fn roll(&self) -> u8 {
        self.rng.lock().random_range(0..100)
    }
}
