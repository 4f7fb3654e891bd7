//! Counters describing injected faults.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Snapshot of fault injection statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosStats {
    /// Requests seen by the injector
    pub requests_seen: u64,
    /// Requests for which a rule fired
    pub faults_injected: u64,
    /// Fired rules that carried a non-zero delay
    pub delays_injected: u64,
    /// Error replies sent in place of the backend's
    pub errors_injected: u64,
    /// Null replies sent in place of the backend's
    pub empty_replies: u64,
    /// Sum of all injected delays (milliseconds)
    pub total_delay_ms: u64,
}

impl ChaosStats {
    /// Share of requests that had a fault injected
    #[allow(clippy::cast_precision_loss)]
    pub fn fault_rate(&self) -> f64 {
        if self.requests_seen == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.requests_seen as f64
        }
    }
}

/// Shared injection counters
///
/// All recording goes through `&self`, so one context can be updated from
/// every connection task at once.
#[derive(Debug, Default)]
pub struct ChaosContext {
    requests_seen: AtomicU64,
    faults_injected: AtomicU64,
    delays_injected: AtomicU64,
    errors_injected: AtomicU64,
    empty_replies: AtomicU64,
    total_delay_ms: AtomicU64,
}

impl ChaosContext {
    /// Create a context with all counters at zero
    pub const fn new() -> Self {
        Self {
            requests_seen: AtomicU64::new(0),
            faults_injected: AtomicU64::new(0),
            delays_injected: AtomicU64::new(0),
            errors_injected: AtomicU64::new(0),
            empty_replies: AtomicU64::new(0),
            total_delay_ms: AtomicU64::new(0),
        }
    }

    /// Record a request being intercepted
    pub fn record_request(&self) {
        self.requests_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rule firing
    pub fn record_fault(&self) {
        self.faults_injected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an injected delay
    pub fn record_delay(&self, delay_ms: u64) {
        self.delays_injected.fetch_add(1, Ordering::Relaxed);
        self.total_delay_ms.fetch_add(delay_ms, Ordering::Relaxed);
    }

    /// Record an error reply
    pub fn record_error(&self) {
        self.errors_injected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a null reply
    pub fn record_empty(&self) {
        self.empty_replies.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy of the current counters
    ///
    /// Counters are read one by one, so a snapshot taken under load may mix
    /// values from slightly different moments.
    pub fn snapshot(&self) -> ChaosStats {
        ChaosStats {
            requests_seen: self.requests_seen.load(Ordering::Relaxed),
            faults_injected: self.faults_injected.load(Ordering::Relaxed),
            delays_injected: self.delays_injected.load(Ordering::Relaxed),
            errors_injected: self.errors_injected.load(Ordering::Relaxed),
            empty_replies: self.empty_replies.load(Ordering::Relaxed),
            total_delay_ms: self.total_delay_ms.load(Ordering::Relaxed),
        }
    }

    /// Reset every counter to zero
    pub fn reset(&self) {
        for counter in [
            &self.requests_seen,
            &self.faults_injected,
            &self.delays_injected,
            &self.errors_injected,
            &self.empty_replies,
            &self.total_delay_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
