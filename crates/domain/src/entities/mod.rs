//! Domain entities

mod rule;
mod rule_definition;

pub use rule::Rule;
pub use rule_definition::RuleDefinition;
