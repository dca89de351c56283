//! Config value validation tests for edge-gate-config.
// crates/edge-gate-config/tests/value_validation.rs
// =============================================================================
// Module: Config Value Validation Tests
// Description: Validate risk threshold, server, and cache value constraints.
// Purpose: Ensure gateway settings fail closed at the config boundary.
// =============================================================================

use std::path::PathBuf;

use edge_gate_config::ConfigError;
use edge_gate_config::EdgeGateConfig;
use edge_gate_core::runtime::FailMode;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn default_config_is_valid() -> TestResult {
    EdgeGateConfig::default().validate().map_err(|err| err.to_string())
}

#[test]
fn rejects_block_threshold_above_one() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.risk.block_threshold = 1.5;
    assert_invalid(config.validate(), "risk.block_threshold must lie in [0.0, 1.0]")
}

#[test]
fn rejects_negative_audit_threshold() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.risk.audit_threshold = -0.1;
    assert_invalid(config.validate(), "risk.audit_threshold must lie in [0.0, 1.0]")
}

#[test]
fn rejects_non_finite_threshold() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.risk.block_threshold = f64::NAN;
    assert_invalid(config.validate(), "risk.block_threshold must lie in [0.0, 1.0]")
}

#[test]
fn rejects_block_threshold_below_audit_threshold() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.risk.block_threshold = 0.5;
    config.risk.audit_threshold = 0.8;
    assert_invalid(config.validate(), "must be >= risk.audit_threshold")
}

#[test]
fn rejects_blank_server_bind() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.server.bind = "   ".to_string();
    assert_invalid(config.validate(), "server.bind must be non-empty")
}

#[test]
fn rejects_empty_cache_path_when_enabled() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.cache.enabled = true;
    config.cache.path = PathBuf::new();
    assert_invalid(config.validate(), "cache.path must be non-empty")
}

#[test]
fn allows_empty_cache_path_when_disabled() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.cache.enabled = false;
    config.cache.path = PathBuf::new();
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn validator_config_mirrors_the_risk_section() -> TestResult {
    let mut config = EdgeGateConfig::default();
    config.risk.fail_mode = FailMode::Closed;
    config.risk.elevated_fail_mode = FailMode::Closed;
    let validator = config.risk.validator_config();
    if validator.fail_mode != FailMode::Closed || validator.elevated_fail_mode != FailMode::Closed
    {
        return Err("validator config did not mirror risk section".to_string());
    }
    Ok(())
}
