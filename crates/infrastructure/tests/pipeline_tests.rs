//! Integration tests for the infrastructure crate
//!
//! Loads a configuration file, builds the injector from it and drives
//! requests through it as the proxy would.

use std::{io::Write, time::Duration};

use infrastructure::{
    AppConfig, BootstrapError, ConfigError, InterceptDecision, build_injector,
    chaos::{NULL_BULK_REPLY, error_reply},
};
use proptest::prelude::*;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[logging]
filter = "warn"

[plan]
seed = 99

[[plan.rules]]
name = "backend_down"
client_addr = "10.0.0.7"
return_err = "ERR backend unavailable"

[[plan.rules]]
name = "slow_get"
command = "get"
delay = 20

[[plan.rules]]
name = "lost_hash"
command = "HGET"
return_empty = true
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn load_injector() -> infrastructure::FaultInjector {
    let file = write_config(CONFIG);
    let config = AppConfig::load_from(file.path()).expect("config should load");
    build_injector(&config).expect("injector should build")
}

#[tokio::test]
async fn requests_follow_configured_rules() {
    let injector = load_injector();

    let from_bad_client = injector
        .intercept("10.0.0.7:41234", b"*1\r\n$4\r\nPING\r\n")
        .await;
    // the configured address must start with the observed one
    assert!(from_bad_client.is_forward());

    let decision = injector.intercept("10.0.0.7", b"*1\r\n$4\r\nPING\r\n").await;
    assert_eq!(
        decision,
        InterceptDecision::Reply(b"-ERR backend unavailable\r\n".to_vec())
    );

    let start = std::time::Instant::now();
    let decision = injector
        .intercept("10.0.0.8", b"*2\r\n$3\r\nGET\r\n$1\r\nk\r\n")
        .await;
    assert!(decision.is_forward());
    assert!(start.elapsed() >= Duration::from_millis(20));

    let decision = injector
        .intercept("10.0.0.8", b"*3\r\n$4\r\nHGET\r\n$1\r\nh\r\n$1\r\nf\r\n")
        .await;
    assert_eq!(decision, InterceptDecision::Reply(NULL_BULK_REPLY.to_vec()));

    let stats = injector.stats();
    assert_eq!(stats.requests_seen, 4);
    assert_eq!(stats.faults_injected, 3);
    assert_eq!(stats.errors_injected, 1);
    assert_eq!(stats.empty_replies, 1);
    assert_eq!(stats.total_delay_ms, 20);

    let plan_stats = injector.plan().stats();
    let hits: Vec<_> = plan_stats.iter().map(|s| (s.name.as_str(), s.hits)).collect();
    assert_eq!(
        hits,
        [("backend_down", 1), ("slow_get", 1), ("lost_hash", 1)]
    );
}

#[test]
fn injector_works_outside_a_runtime_builder() {
    let injector = load_injector();
    let decision = tokio_test::block_on(injector.intercept("10.0.0.9", b"PING"));
    assert!(decision.is_forward());
}

#[test]
fn invalid_rules_stop_bootstrap() {
    let file = write_config(
        r#"
        [[plan.rules]]
        name = "too_likely"
        percentage = 200
        "#,
    );
    let config = AppConfig::load_from(file.path()).expect("config should load");

    let err = build_injector(&config).unwrap_err();
    assert!(matches!(
        err,
        BootstrapError::Config(ConfigError::InvalidRule { ref name, .. }) if name == "too_likely"
    ));
}

#[test]
fn logging_section_is_optional() {
    let file = write_config("[plan]\nseed = 1\n");
    let config = AppConfig::load_from(file.path()).expect("config should load");
    assert_eq!(config.logging.filter, "info");
    assert_eq!(config.plan.seed, Some(1));
}

proptest! {
    #[test]
    fn error_replies_are_single_lines(message in ".*") {
        let reply = error_reply(&message);
        prop_assert_eq!(reply[0], b'-');
        prop_assert!(reply.ends_with(b"\r\n"));
        let body = &reply[1..reply.len() - 2];
        prop_assert!(!body.contains(&b'\r'));
        prop_assert!(!body.contains(&b'\n'));
        prop_assert_eq!(body.len(), message.len());
    }
}
