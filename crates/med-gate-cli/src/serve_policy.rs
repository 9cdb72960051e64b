// crates/med-gate-cli/src/serve_policy.rs
// ============================================================================
// Module: Serve Policy
// Description: Network exposure policy checks for the CLI server launcher.
// Purpose: Enforce safe-by-default bind behavior with explicit opt-in.
// Dependencies: thiserror, std
// ============================================================================

//! ## Overview
//! Provides safety checks for binding the gateway to non-loopback addresses.
//! The policy is fail-closed: loopback binds always pass, while network
//! exposure requires an explicit flag or environment opt-in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable enabling non-loopback server binds.
pub const ALLOW_NON_LOOPBACK_ENV: &str = "MED_GATE_ALLOW_NON_LOOPBACK";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Bind outcome metadata for exposure warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOutcome {
    /// Parsed bind address.
    pub addr: SocketAddr,
    /// True when the server is bound to a non-loopback address.
    pub network_exposed: bool,
}

/// Serve policy failures for bind safety.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServePolicyError {
    /// The opt-in environment variable was set to an invalid value.
    #[error("invalid opt-in environment value: {value}")]
    InvalidEnv {
        /// Raw environment value.
        value: String,
    },
    /// The bind string failed to parse.
    #[error("bind address does not parse: {bind}")]
    InvalidBind {
        /// Raw bind value.
        bind: String,
    },
    /// Non-loopback binding requires explicit opt-in.
    #[error("non-loopback bind requires explicit opt-in: {bind}")]
    NonLoopbackOptInRequired {
        /// Bind address.
        bind: String,
    },
}

// ============================================================================
// SECTION: Policy Checks
// ============================================================================

/// Resolves the non-loopback opt-in from the CLI flag and environment.
///
/// # Errors
///
/// Returns [`ServePolicyError::InvalidEnv`] when the environment value is
/// not a recognized boolean.
pub fn resolve_allow_non_loopback(flag: bool) -> Result<bool, ServePolicyError> {
    if flag {
        return Ok(true);
    }
    let Some(value) = env::var_os(ALLOW_NON_LOOPBACK_ENV) else {
        return Ok(false);
    };
    let value = value.to_string_lossy().to_string();
    parse_allow_value(&value)
}

/// Parses an opt-in environment value into a boolean.
///
/// # Errors
///
/// Returns [`ServePolicyError::InvalidEnv`] for unrecognized values.
pub fn parse_allow_value(value: &str) -> Result<bool, ServePolicyError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(ServePolicyError::InvalidEnv {
            value: value.to_string(),
        }),
    }
}

/// Enforces the bind policy for the given address string.
///
/// # Errors
///
/// Returns [`ServePolicyError::InvalidBind`] when the address does not parse
/// and [`ServePolicyError::NonLoopbackOptInRequired`] when network exposure
/// was not explicitly allowed.
pub fn enforce_bind_policy(
    bind: &str,
    allow_non_loopback: bool,
) -> Result<BindOutcome, ServePolicyError> {
    let addr: SocketAddr = bind.parse().map_err(|_| ServePolicyError::InvalidBind {
        bind: bind.to_string(),
    })?;
    let network_exposed = !addr.ip().is_loopback();
    if network_exposed && !allow_non_loopback {
        return Err(ServePolicyError::NonLoopbackOptInRequired {
            bind: bind.to_string(),
        });
    }
    Ok(BindOutcome {
        addr,
        network_exposed,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
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

    use super::ServePolicyError;
    use super::enforce_bind_policy;
    use super::parse_allow_value;
    use super::resolve_allow_non_loopback;

    /// Tests that loopback binds pass without opt-in.
    #[test]
    fn loopback_bind_passes_without_opt_in() {
        let outcome = enforce_bind_policy("127.0.0.1:8080", false).unwrap();
        assert!(!outcome.network_exposed);
        assert_eq!(outcome.addr.port(), 8080);
    }

    /// Tests that non-loopback binds are rejected without opt-in.
    #[test]
    fn non_loopback_bind_requires_opt_in() {
        let error = enforce_bind_policy("0.0.0.0:8080", false).unwrap_err();
        assert!(matches!(
            error,
            ServePolicyError::NonLoopbackOptInRequired {
                ..
            }
        ));
    }

    /// Tests that non-loopback binds pass with opt-in and flag exposure.
    #[test]
    fn non_loopback_bind_passes_with_opt_in() {
        let outcome = enforce_bind_policy("0.0.0.0:8080", true).unwrap();
        assert!(outcome.network_exposed);
    }

    /// Tests that unparseable binds are rejected.
    #[test]
    fn invalid_bind_is_rejected() {
        let error = enforce_bind_policy("not-an-address", true).unwrap_err();
        assert!(matches!(
            error,
            ServePolicyError::InvalidBind {
                ..
            }
        ));
    }

    /// Tests accepted and rejected opt-in environment values.
    #[test]
    fn allow_values_parse_fail_closed() {
        assert!(parse_allow_value("1").unwrap());
        assert!(parse_allow_value("true").unwrap());
        assert!(parse_allow_value("YES").unwrap());
        assert!(!parse_allow_value("0").unwrap());
        assert!(!parse_allow_value("false").unwrap());
        assert!(!parse_allow_value("").unwrap());
        assert!(parse_allow_value("maybe").is_err());
    }

    /// Tests that the explicit flag short-circuits the environment.
    #[test]
    fn explicit_flag_wins() {
        assert!(resolve_allow_non_loopback(true).unwrap());
    }
}
