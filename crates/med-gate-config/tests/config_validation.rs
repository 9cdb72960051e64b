// crates/med-gate-config/tests/config_validation.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Tests for fail-closed configuration validation.
// Purpose: Validate rejection of invalid binds, agents, and unknown keys.
// Dependencies: med-gate-config
// ============================================================================

//! ## Overview
//! Tests configuration validation for:
//! - Invalid bind addresses
//! - Empty and oversized user agents
//! - Unknown keys rejected by strict parsing

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use med_gate_config::ConfigError;
use med_gate_config::MedGateConfig;

// ============================================================================
// SECTION: Bind Validation Tests
// ============================================================================

/// Tests that a non-address bind string is rejected.
#[test]
fn invalid_bind_is_rejected() {
    let error = MedGateConfig::from_toml("[server]\nbind = \"not-an-address\"").unwrap_err();
    let ConfigError::Invalid {
        detail,
    } = error
    else {
        panic!("expected invalid config error");
    };
    assert!(detail.contains("server.bind"));
}

/// Tests that a bind string without a port is rejected.
#[test]
fn bind_without_port_is_rejected() {
    let result = MedGateConfig::from_toml("[server]\nbind = \"127.0.0.1\"");
    assert!(result.is_err());
}

// ============================================================================
// SECTION: User Agent Validation Tests
// ============================================================================

/// Tests that an empty user agent is rejected.
#[test]
fn empty_user_agent_is_rejected() {
    let error = MedGateConfig::from_toml("[outbound]\nuser_agent = \"\"").unwrap_err();
    let ConfigError::Invalid {
        detail,
    } = error
    else {
        panic!("expected invalid config error");
    };
    assert!(detail.contains("user_agent"));
}

/// Tests that an oversized user agent is rejected.
#[test]
fn oversized_user_agent_is_rejected() {
    let agent = "a".repeat(257);
    let raw = format!("[outbound]\nuser_agent = \"{agent}\"");
    let result = MedGateConfig::from_toml(&raw);
    assert!(result.is_err());
}

/// Tests that a maximal-length user agent is accepted.
#[test]
fn maximal_user_agent_is_accepted() {
    let agent = "a".repeat(256);
    let raw = format!("[outbound]\nuser_agent = \"{agent}\"");
    let config = MedGateConfig::from_toml(&raw).unwrap();
    assert_eq!(config.outbound.user_agent.len(), 256);
}

// ============================================================================
// SECTION: Strict Parsing Tests
// ============================================================================

/// Tests that unknown top-level keys are rejected.
#[test]
fn unknown_top_level_key_is_rejected() {
    let result = MedGateConfig::from_toml("[storage]\npath = \"/tmp/x\"");
    assert!(result.is_err());
}

/// Tests that unknown nested keys are rejected.
#[test]
fn unknown_nested_key_is_rejected() {
    let result = MedGateConfig::from_toml("[server]\nbind = \"127.0.0.1:8080\"\ntls = true");
    assert!(result.is_err());
}
