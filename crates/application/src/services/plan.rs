//! Plan - the ordered set of fault-injection rules
//!
//! The proxy calls [`Plan::select_rule`] once per inbound request; the
//! administrative side adds, fetches and deletes rules. A single
//! reader/writer lock guards the rule sequence: lookups share it, mutations
//! take it exclusively. Hit counters live on the rules themselves and are
//! bumped atomically under the read lock.

use std::sync::Arc;

use domain::{Rule, RuleDefinition, extract_command};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{error::ApplicationError, ports::PercentRollPort, services::ThreadRngPercentRoll};

/// Per-rule statistics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    /// Rule name
    pub name: String,
    /// Firing percentage (0 = always)
    pub percentage: u8,
    /// Times the rule fired
    pub hits: u64,
}

/// Ordered, concurrently accessible collection of rules
pub struct Plan {
    rules: RwLock<Vec<Arc<Rule>>>,
    roller: Arc<dyn PercentRollPort>,
}

impl std::fmt::Debug for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plan")
            .field("rules", &self.rules.read().len())
            .field("roller", &self.roller)
            .finish()
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    /// Create an empty plan using the thread-local RNG for the probability gate
    pub fn new() -> Self {
        Self::with_roller(Arc::new(ThreadRngPercentRoll))
    }

    /// Create an empty plan with a custom source of randomness
    pub fn with_roller(roller: Arc<dyn PercentRollPort>) -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            roller,
        }
    }

    /// Append a rule
    ///
    /// The rule's command is already marshaled by construction, so it takes
    /// part in matching as soon as this returns.
    #[instrument(skip(self, rule), fields(rule = %rule.name()))]
    pub fn add_rule(&self, rule: Rule) -> Result<Arc<Rule>, ApplicationError> {
        let mut rules = self.rules.write();
        if rules.iter().any(|existing| existing.name() == rule.name()) {
            return Err(ApplicationError::DuplicateRule(rule.name().to_string()));
        }

        let rule = Arc::new(rule);
        rules.push(Arc::clone(&rule));
        info!(rules = rules.len(), "Rule added");
        Ok(rule)
    }

    /// Validate a definition and append the resulting rule
    #[instrument(skip(self, definition), fields(rule = %definition.name))]
    pub fn add_definition(&self, definition: RuleDefinition) -> Result<Arc<Rule>, ApplicationError> {
        let rule = Rule::try_from(definition)?;
        self.add_rule(rule)
    }

    /// Look up a rule by name
    ///
    /// The name is trimmed the same way it was when the rule was built.
    /// Returns the live rule, so its hit counter keeps moving.
    pub fn get_rule(&self, name: &str) -> Result<Arc<Rule>, ApplicationError> {
        let name = name.trim();
        self.rules
            .read()
            .iter()
            .find(|rule| rule.name() == name)
            .cloned()
            .ok_or_else(|| ApplicationError::RuleNotFound(name.to_string()))
    }

    /// Remove a rule by name, keeping the order of the others
    #[instrument(skip(self))]
    pub fn delete_rule(&self, name: &str) -> Result<Arc<Rule>, ApplicationError> {
        let name = name.trim();
        let mut rules = self.rules.write();
        let index = rules
            .iter()
            .position(|rule| rule.name() == name)
            .ok_or_else(|| ApplicationError::RuleNotFound(name.to_string()))?;

        let removed = rules.remove(index);
        info!(rules = rules.len(), "Rule deleted");
        Ok(removed)
    }

    /// Marshal every rule's command again
    ///
    /// Idempotent. Rules are swapped for fresh copies that share their hit
    /// counters with the previous ones.
    #[instrument(skip(self))]
    pub fn marshal_commands(&self) {
        let mut rules = self.rules.write();
        for slot in rules.iter_mut() {
            *slot = Arc::new(slot.remarshaled());
        }
        debug!(rules = rules.len(), "Commands marshaled");
    }

    /// Pick the rule to apply to an inbound request
    ///
    /// Rules are scanned in registration order. The first one whose address
    /// and command predicates match and whose probability gate opens has its
    /// hit counter bumped and is returned. Never fails: requests without a
    /// usable command token only match rules without a command filter.
    pub fn select_rule(&self, client_addr: &str, raw_command: &[u8]) -> Option<Arc<Rule>> {
        let rules = self.rules.read();
        let token = extract_command(raw_command);

        for rule in rules.iter() {
            if !rule.matches(client_addr, token) {
                continue;
            }

            let percentage = rule.percentage();
            if !percentage.is_ungated() && !percentage.admits(self.roller.roll()) {
                continue;
            }

            let hits = rule.record_hit();
            debug!(rule = %rule.name(), client_addr, hits, "Rule fired");
            return Some(Arc::clone(rule));
        }

        None
    }

    /// Snapshot of the rules in registration order
    pub fn rules(&self) -> Vec<Arc<Rule>> {
        self.rules.read().clone()
    }

    /// Hit statistics for every rule, in registration order
    pub fn stats(&self) -> Vec<RuleStats> {
        self.rules
            .read()
            .iter()
            .map(|rule| RuleStats {
                name: rule.name().to_string(),
                percentage: rule.percentage().value(),
                hits: rule.hits(),
            })
            .collect()
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Whether no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    /// Remove every rule
    #[instrument(skip(self))]
    pub fn clear(&self) {
        self.rules.write().clear();
        info!("Plan cleared");
    }
}
