//! Applying selected rules to live traffic
//!
//! The plan only decides which rule applies to a request. This module is the
//! proxy-facing half that carries the decision out: it sleeps for the rule's
//! delay and, for short-circuiting rules, produces the reply that is sent to
//! the client in place of the backend's.
//!
//! # Overview
//!
//! - `FaultInjector`: wraps a shared plan and turns each request into an
//!   `InterceptDecision`
//! - `ChaosContext`: lock-free counters describing what was injected
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use application::Plan;
//! use infrastructure::chaos::{FaultInjector, InterceptDecision};
//!
//! let injector = FaultInjector::new(Arc::new(plan));
//!
//! match injector.intercept(&peer_addr, &request).await {
//!     InterceptDecision::Forward => backend.write_all(&request).await?,
//!     InterceptDecision::Reply(bytes) => client.write_all(&bytes).await?,
//! }
//! ```

mod chaos_context;
mod fault_injector;

pub use chaos_context::{ChaosContext, ChaosStats};
pub use fault_injector::{
    FaultInjector, FaultInjectorConfig, InterceptDecision, NULL_BULK_REPLY, error_reply,
};
