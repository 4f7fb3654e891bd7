//! Value Objects - Immutable, identity-less domain primitives

mod client_addr;
mod command;
mod percentage;
mod rule_name;

pub use client_addr::ClientAddrFilter;
pub use command::{CommandFilter, MarshaledCommand, extract_command, marshal_command};
pub use percentage::Percentage;
pub use rule_name::RuleName;
