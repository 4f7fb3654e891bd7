//! Domain layer for RedFault
//!
//! Contains the fault-injection rule entity, its value objects and domain
//! errors. This layer has no I/O and defines the ubiquitous language shared by
//! the plan service and its adapters.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
