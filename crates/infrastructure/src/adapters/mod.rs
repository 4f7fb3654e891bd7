//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod seeded_percent_roll;

pub use seeded_percent_roll::SeededPercentRoll;
