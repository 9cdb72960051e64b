// crates/med-gate-config/src/config.rs
// ============================================================================
// Module: Med Gate Configuration
// Description: Gateway configuration model, loading, and validation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! The gateway reads one TOML file covering the listener bind address and the
//! outbound client identity. Path resolution prefers an explicit argument,
//! then the `MED_GATE_CONFIG` environment variable, then the default file
//! name in the working directory. A missing default file yields defaults; an
//! unreadable, oversized, unknown-key, or invalid file is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "med-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "MED_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of the outbound user agent string.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Default listener bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default outbound user agent.
const DEFAULT_USER_AGENT: &str = "med-gate/0.1.0";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Med Gate gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MedGateConfig {
    /// HTTP listener configuration.
    pub server: ServerConfig,
    /// Outbound request configuration.
    pub outbound: OutboundConfig,
}

/// HTTP listener configuration.
///
/// # Invariants
/// - `bind` must parse as a socket address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Listener bind address.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Outbound request configuration.
///
/// # Invariants
/// - `user_agent` is non-empty and bounded by `MAX_USER_AGENT_LENGTH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutboundConfig {
    /// User agent for requests issued by the gateway.
    pub user_agent: String,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("config read failed: {path}: {detail}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying failure detail.
        detail: String,
    },
    /// The configuration file exceeds the size limit.
    #[error("config file too large: {path}")]
    TooLarge {
        /// Offending path.
        path: PathBuf,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("config parse failed: {detail}")]
    Parse {
        /// Parser failure detail.
        detail: String,
    },
    /// A configuration value failed validation.
    #[error("invalid config: {detail}")]
    Invalid {
        /// Validation failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl MedGateConfig {
    /// Loads configuration from the resolved path.
    ///
    /// Resolution order: explicit path, `MED_GATE_CONFIG`, then
    /// `med-gate.toml` in the working directory. Only the implicit default
    /// file is allowed to be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds the
    /// size limit, fails to parse, or fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = resolve_config_path(path);
        if !explicit && !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let config = Self::from_file(&path)?;
        Ok(config)
    }

    /// Loads configuration from an explicit file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds the
    /// size limit, fails to parse, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE as u64 {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        let config = Self::from_toml(&raw)?;
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|err| ConfigError::Parse {
            detail: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configured values against hard limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.bind_addr()?;
        if self.outbound.user_agent.is_empty() {
            return Err(ConfigError::Invalid {
                detail: "outbound.user_agent must not be empty".to_string(),
            });
        }
        if self.outbound.user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid {
                detail: "outbound.user_agent exceeds length limit".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the parsed listener bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the bind string does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|_| ConfigError::Invalid {
            detail: format!("server.bind is not a socket address: {}", self.server.bind),
        })
    }
}

/// Resolves the config path and whether it was explicitly requested.
fn resolve_config_path(path: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path.to_path_buf(), true);
    }
    if let Some(value) = env::var_os(CONFIG_ENV_VAR) {
        return (PathBuf::from(value), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_NAME), false)
}
