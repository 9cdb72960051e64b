// crates/med-gate-config/src/lib.rs
// ============================================================================
// Module: Med Gate Config
// Description: Configuration loading and validation for the Med Gate gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size limits and
//! unknown-key rejection. A missing default file yields defaults; an invalid
//! or oversized file fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::MedGateConfig;
pub use config::OutboundConfig;
pub use config::ServerConfig;
