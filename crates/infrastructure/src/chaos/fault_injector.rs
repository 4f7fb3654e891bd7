//! Fault injector for the proxy's request path.
//!
//! Consults the plan for every intercepted request and applies the selected
//! rule: sleep for its delay, then either forward the request or answer it
//! directly with an error or a null reply.

use std::{sync::Arc, time::Duration};

use application::Plan;
use domain::Rule;
use tracing::{debug, instrument};

use super::{ChaosContext, ChaosStats};

/// Null bulk reply sent for rules that return an empty value
pub const NULL_BULK_REPLY: &[u8] = b"$-1\r\n";

/// Encode an error reply line (`-<message>\r\n`)
///
/// CR and LF inside the message would end the line early and are replaced
/// with spaces.
pub fn error_reply(message: &str) -> Vec<u8> {
    let mut reply = Vec::with_capacity(message.len() + 3);
    reply.push(b'-');
    reply.extend(
        message
            .bytes()
            .map(|b| if matches!(b, b'\r' | b'\n') { b' ' } else { b }),
    );
    reply.extend_from_slice(b"\r\n");
    reply
}

/// Configuration for the fault injector
#[derive(Debug, Clone, Default)]
pub struct FaultInjectorConfig {
    /// Skip rule selection entirely and forward everything
    pub disabled: bool,
    /// Upper bound on any single injected delay
    pub max_delay: Option<Duration>,
}

impl FaultInjectorConfig {
    /// Config with fault injection enabled
    pub const fn enabled() -> Self {
        Self {
            disabled: false,
            max_delay: None,
        }
    }

    /// Config with fault injection disabled
    pub const fn disabled() -> Self {
        Self {
            disabled: true,
            max_delay: None,
        }
    }

    /// Cap injected delays
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }
}

/// What the proxy should do with an intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptDecision {
    /// Pass the request on to the backend
    Forward,
    /// Send these bytes to the client instead of forwarding
    Reply(Vec<u8>),
}

impl InterceptDecision {
    /// Whether the request reaches the backend
    pub const fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Applies plan rules to intercepted requests
///
/// Shared by reference across connection tasks.
#[derive(Debug)]
pub struct FaultInjector {
    config: FaultInjectorConfig,
    plan: Arc<Plan>,
    context: ChaosContext,
}

impl FaultInjector {
    /// Create an injector over a shared plan
    pub fn new(plan: Arc<Plan>) -> Self {
        Self::with_config(FaultInjectorConfig::default(), plan)
    }

    /// Create an injector with custom configuration
    pub const fn with_config(config: FaultInjectorConfig, plan: Arc<Plan>) -> Self {
        Self {
            config,
            plan,
            context: ChaosContext::new(),
        }
    }

    /// The plan rules are selected from
    pub fn plan(&self) -> &Arc<Plan> {
        &self.plan
    }

    /// Select the rule for a request and record it, without sleeping
    pub fn evaluate(&self, client_addr: &str, raw_command: &[u8]) -> Option<Arc<Rule>> {
        self.context.record_request();
        if self.config.disabled {
            return None;
        }

        let rule = self.plan.select_rule(client_addr, raw_command)?;
        self.context.record_fault();
        Some(rule)
    }

    /// Delay actually applied for a rule
    fn effective_delay(&self, rule: &Rule) -> Duration {
        match self.config.max_delay {
            Some(max) => rule.delay().min(max),
            None => rule.delay(),
        }
    }

    /// Reply that replaces the backend's, if the rule short-circuits
    ///
    /// An error payload wins over an empty reply when both are set.
    fn reply_for(&self, rule: &Rule) -> Option<Vec<u8>> {
        if let Some(err) = rule.return_err() {
            self.context.record_error();
            return Some(error_reply(err));
        }
        if rule.return_empty() {
            self.context.record_empty();
            return Some(NULL_BULK_REPLY.to_vec());
        }
        None
    }

    /// Intercept one request
    ///
    /// Sleeps for the selected rule's delay before returning, so the caller
    /// can act on the decision immediately.
    #[instrument(skip(self, raw_command), fields(len = raw_command.len()))]
    pub async fn intercept(&self, client_addr: &str, raw_command: &[u8]) -> InterceptDecision {
        let Some(rule) = self.evaluate(client_addr, raw_command) else {
            return InterceptDecision::Forward;
        };

        let delay = self.effective_delay(&rule);
        if !delay.is_zero() {
            self.context
                .record_delay(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(&rule) {
            Some(reply) => {
                debug!(rule = %rule.name(), "Short-circuiting request");
                InterceptDecision::Reply(reply)
            },
            None => InterceptDecision::Forward,
        }
    }

    /// Current statistics
    pub fn stats(&self) -> ChaosStats {
        self.context.snapshot()
    }

    /// Reset statistics
    ///
    /// Rule hit counters live on the plan and are left untouched.
    pub fn reset(&self) {
        self.context.reset();
    }
}
