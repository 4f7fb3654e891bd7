//! Application layer - Use cases and orchestration
//!
//! Hosts the fault plan: rule registration, lookup and per-request
//! selection. Randomness for the probability gate is reached through a port
//! so adapters can supply seeded or deterministic sources.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
