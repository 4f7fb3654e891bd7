//! Application services - Use case implementations

mod percent_roll;
mod plan;

pub use percent_roll::ThreadRngPercentRoll;
pub use plan::{Plan, RuleStats};
