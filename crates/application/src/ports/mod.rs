//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod percent_roll_port;

#[cfg(test)]
pub use percent_roll_port::MockPercentRollPort;
pub use percent_roll_port::PercentRollPort;
