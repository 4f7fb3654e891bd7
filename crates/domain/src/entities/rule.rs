//! Rule entity - a single fault-injection directive
//!
//! A rule pairs a predicate (client address, protocol command) with an
//! effect (delay, forced error, forced empty reply), gated by a firing
//! percentage. The command's marshaled form is derived when the command is
//! set and cannot be changed on its own. The hit counter is the only state
//! that changes once a rule is shared.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::entities::RuleDefinition;
use crate::errors::DomainError;
use crate::value_objects::{ClientAddrFilter, CommandFilter, Percentage, RuleName};

/// A fault-injection rule
#[derive(Debug)]
pub struct Rule {
    name: RuleName,
    client_addr: ClientAddrFilter,
    command: CommandFilter,
    delay: Duration,
    return_err: Option<String>,
    return_empty: bool,
    percentage: Percentage,
    hits: Arc<AtomicU64>,
}

impl Rule {
    /// Create a rule that matches everything and has no effect yet
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        Ok(Self {
            name: RuleName::new(name)?,
            client_addr: ClientAddrFilter::any(),
            command: CommandFilter::any(),
            delay: Duration::ZERO,
            return_err: None,
            return_empty: false,
            percentage: Percentage::default(),
            hits: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Restrict the rule to a client address
    #[must_use]
    pub fn with_client_addr(mut self, addr: impl AsRef<str>) -> Self {
        self.client_addr = ClientAddrFilter::new(addr);
        self
    }

    /// Restrict the rule to a protocol command
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = CommandFilter::new(command);
        self
    }

    /// Delay matching requests
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Answer matching requests with an error instead of forwarding
    ///
    /// An empty payload clears the effect.
    #[must_use]
    pub fn with_return_err(mut self, err: impl Into<String>) -> Self {
        let err = err.into();
        self.return_err = (!err.is_empty()).then_some(err);
        self
    }

    /// Answer matching requests with an empty reply instead of forwarding
    #[must_use]
    pub const fn with_return_empty(mut self, return_empty: bool) -> Self {
        self.return_empty = return_empty;
        self
    }

    /// Set the firing percentage
    #[must_use]
    pub const fn with_percentage(mut self, percentage: Percentage) -> Self {
        self.percentage = percentage;
        self
    }

    /// Unique name
    pub fn name(&self) -> &RuleName {
        &self.name
    }

    /// Client address filter
    pub fn client_addr(&self) -> &ClientAddrFilter {
        &self.client_addr
    }

    /// Command filter, including its marshaled form
    pub fn command(&self) -> &CommandFilter {
        &self.command
    }

    /// Delay to apply before the request proceeds
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Error payload to reply with, if any
    pub fn return_err(&self) -> Option<&str> {
        self.return_err.as_deref()
    }

    /// Whether to reply with an empty value
    pub const fn return_empty(&self) -> bool {
        self.return_empty
    }

    /// Firing percentage
    pub const fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// How many times this rule has fired
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Record that the rule fired, returning the new hit count
    ///
    /// Safe to call from many threads holding shared references.
    pub fn record_hit(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Whether the request must not be forwarded when this rule fires
    pub const fn short_circuits(&self) -> bool {
        self.return_err.is_some() || self.return_empty
    }

    /// Check the address and command predicates
    ///
    /// `command_token` is the token extracted from the request, if any.
    pub fn matches(&self, client_addr: &str, command_token: Option<&[u8]>) -> bool {
        self.client_addr.matches(client_addr) && self.command.matches(command_token)
    }

    /// Copy of this rule with its command marshaled again
    ///
    /// The copy shares the hit counter with `self`.
    #[must_use]
    pub fn remarshaled(&self) -> Self {
        Self {
            name: self.name.clone(),
            client_addr: self.client_addr.clone(),
            command: self.command.remarshaled(),
            delay: self.delay,
            return_err: self.return_err.clone(),
            return_empty: self.return_empty,
            percentage: self.percentage,
            hits: Arc::clone(&self.hits),
        }
    }

    /// Serializable description of this rule
    ///
    /// Delays too long for `u64` milliseconds saturate.
    pub fn definition(&self) -> RuleDefinition {
        RuleDefinition {
            name: self.name.to_string(),
            client_addr: self.client_addr.as_str().to_string(),
            command: self.command.raw().to_string(),
            delay_ms: u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
            return_err: self.return_err.clone(),
            return_empty: self.return_empty,
            percentage: u32::from(self.percentage.value()),
        }
    }
}

impl TryFrom<RuleDefinition> for Rule {
    type Error = DomainError;

    fn try_from(def: RuleDefinition) -> Result<Self, Self::Error> {
        let rule = Self::new(&def.name)?
            .with_client_addr(&def.client_addr)
            .with_command(def.command)
            .with_delay(Duration::from_millis(def.delay_ms))
            .with_return_empty(def.return_empty)
            .with_percentage(Percentage::new(def.percentage)?);

        Ok(match def.return_err {
            Some(err) => rule.with_return_err(err),
            None => rule,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} client={} command={} delay={}ms",
            self.name,
            self.client_addr,
            if self.command.is_any() {
                "*"
            } else {
                self.command.raw()
            },
            self.delay.as_millis()
        )?;
        if let Some(err) = &self.return_err {
            write!(f, " return_err={err:?}")?;
        }
        if self.return_empty {
            f.write_str(" return_empty")?;
        }
        write!(f, " percentage={} hits={}", self.percentage, self.hits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_rule() -> Rule {
        Rule::new("Invalid Key")
            .unwrap()
            .with_command("GET")
            .with_return_err("ERR_INVALID_KEY")
            .with_percentage(Percentage::ALWAYS)
    }

    #[test]
    fn new_rule_matches_everything() {
        let rule = Rule::new("catch_all").unwrap();
        assert!(rule.matches("10.0.0.1", None));
        assert!(rule.matches("10.0.0.1", Some(b"GET")));
        assert_eq!(rule.hits(), 0);
        assert!(!rule.short_circuits());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            Rule::new("  "),
            Err(DomainError::InvalidRuleName(_))
        ));
    }

    #[test]
    fn command_is_marshaled_on_construction() {
        let rule = Rule::new("k1").unwrap().with_command("get");
        assert_eq!(rule.command().raw(), "get");
        assert_eq!(rule.command().marshaled().as_bytes(), b"GET");
    }

    #[test]
    fn matches_requires_both_predicates() {
        let rule = Rule::new("k1")
            .unwrap()
            .with_client_addr("192.0.0.1:8001")
            .with_command("GET");

        assert!(rule.matches("192.0.0.1", Some(b"get")));
        assert!(!rule.matches("172.0.0.1", Some(b"GET")));
        assert!(!rule.matches("192.0.0.1", Some(b"KEYS")));
        assert!(!rule.matches("192.0.0.1", None));
    }

    #[test]
    fn record_hit_counts_up() {
        let rule = get_rule();
        assert_eq!(rule.record_hit(), 1);
        assert_eq!(rule.record_hit(), 2);
        assert_eq!(rule.hits(), 2);
    }

    #[test]
    fn empty_return_err_clears_effect() {
        let rule = Rule::new("k1").unwrap().with_return_err("");
        assert!(rule.return_err().is_none());
        assert!(!rule.short_circuits());
    }

    #[test]
    fn return_empty_short_circuits() {
        let rule = Rule::new("k1").unwrap().with_return_empty(true);
        assert!(rule.short_circuits());
    }

    #[test]
    fn remarshaled_shares_hits() {
        let rule = get_rule();
        rule.record_hit();
        let copy = rule.remarshaled();
        assert_eq!(copy.hits(), 1);
        copy.record_hit();
        assert_eq!(rule.hits(), 2);
        assert_eq!(copy.command(), rule.command());
    }

    #[test]
    fn try_from_definition() {
        let def = RuleDefinition {
            name: "clients_delay".to_string(),
            delay_ms: 50,
            percentage: 20,
            ..Default::default()
        };
        let rule = Rule::try_from(def).unwrap();
        assert_eq!(rule.delay(), Duration::from_millis(50));
        assert_eq!(rule.percentage().value(), 20);
        assert!(rule.command().is_any());
        assert!(rule.client_addr().is_any());
    }

    #[test]
    fn try_from_definition_rejects_bad_percentage() {
        let def = RuleDefinition {
            percentage: 120,
            ..RuleDefinition::named("k1")
        };
        assert!(matches!(
            Rule::try_from(def),
            Err(DomainError::InvalidPercentage(120))
        ));
    }

    #[test]
    fn definition_round_trips_fields() {
        let def = get_rule().definition();
        assert_eq!(def.name, "Invalid Key");
        assert_eq!(def.command, "GET");
        assert_eq!(def.return_err.as_deref(), Some("ERR_INVALID_KEY"));
        assert_eq!(def.percentage, 100);

        let rebuilt = Rule::try_from(def.clone()).unwrap();
        assert_eq!(rebuilt.definition(), def);
    }

    #[test]
    fn definition_saturates_huge_delay() {
        let rule = Rule::new("k1").unwrap().with_delay(Duration::MAX);
        assert_eq!(rule.definition().delay_ms, u64::MAX);
    }

    #[test]
    fn display_summarises_rule() {
        let rule = get_rule().with_delay(Duration::from_millis(5));
        rule.record_hit();
        let text = rule.to_string();
        assert!(text.starts_with("Invalid Key client=* command=GET delay=5ms"));
        assert!(text.contains("return_err=\"ERR_INVALID_KEY\""));
        assert!(text.ends_with("percentage=100% hits=1"));
    }
}
