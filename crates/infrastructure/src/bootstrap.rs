//! Building runtime components from configuration

use std::sync::Arc;

use application::{ApplicationError, PercentRollPort, Plan, ThreadRngPercentRoll};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    adapters::SeededPercentRoll,
    chaos::FaultInjector,
    config::{AppConfig, ConfigError, PlanConfig},
};

/// Startup errors
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rule could not be registered
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// Build a plan holding the configured rules, in order
///
/// Uses a seeded roll when `plan.seed` is set. Rejects invalid definitions and
/// duplicate names; on error no plan is returned.
#[instrument(skip(config), fields(rules = config.rules.len(), seeded = config.is_seeded()))]
pub fn build_plan(config: &PlanConfig) -> Result<Plan, BootstrapError> {
    let roller: Arc<dyn PercentRollPort> = match config.seed {
        Some(seed) => Arc::new(SeededPercentRoll::new(seed)),
        None => Arc::new(ThreadRngPercentRoll),
    };

    let plan = Plan::with_roller(roller);
    for definition in &config.rules {
        plan.add_definition(definition.clone())?;
    }
    plan.marshal_commands();

    info!(rules = plan.len(), "Plan built from configuration");
    Ok(plan)
}

/// Validate the configuration and build an injector over its plan
pub fn build_injector(config: &AppConfig) -> Result<FaultInjector, BootstrapError> {
    config.validate()?;
    let plan = build_plan(&config.plan)?;
    Ok(FaultInjector::new(Arc::new(plan)))
}

#[cfg(test)]
mod tests {
    use domain::RuleDefinition;

    use super::*;

    fn definition(name: &str, command: &str) -> RuleDefinition {
        RuleDefinition {
            command: command.to_string(),
            ..RuleDefinition::named(name)
        }
    }

    #[test]
    fn empty_config_builds_empty_plan() {
        let plan = build_plan(&PlanConfig::default()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn keeps_registration_order() {
        let config = PlanConfig {
            seed: None,
            rules: vec![definition("a", "get"), definition("b", "set")],
        };
        let plan = build_plan(&config).unwrap();

        let names: Vec<_> = plan.rules().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(plan.select_rule("1.2.3.4", b"\r\nGET\r\nk").is_some());
    }

    #[test]
    fn duplicate_names_fail() {
        let config = PlanConfig {
            seed: None,
            rules: vec![definition("a", "get"), definition("a", "set")],
        };
        let err = build_plan(&config).unwrap_err();
        assert!(matches!(err, BootstrapError::Application(ref e) if e.is_duplicate()));
    }

    #[test]
    fn seeded_plans_fire_identically() {
        let config = PlanConfig {
            seed: Some(1234),
            rules: vec![RuleDefinition {
                percentage: 50,
                ..RuleDefinition::named("coin")
            }],
        };

        let fire_pattern = |plan: &Plan| -> Vec<bool> {
            (0..200)
                .map(|_| plan.select_rule("1.2.3.4", b"GET k").is_some())
                .collect()
        };

        let first = fire_pattern(&build_plan(&config).unwrap());
        let second = fire_pattern(&build_plan(&config).unwrap());
        assert_eq!(first, second);
        assert!(first.iter().any(|f| *f));
        assert!(first.iter().any(|f| !*f));
    }

    #[test]
    fn injector_requires_valid_config() {
        let mut config = AppConfig::default();
        config.plan.rules.push(RuleDefinition {
            percentage: 101,
            ..RuleDefinition::named("bad")
        });
        assert!(matches!(
            build_injector(&config),
            Err(BootstrapError::Config(ConfigError::InvalidRule { .. }))
        ));
    }
}
