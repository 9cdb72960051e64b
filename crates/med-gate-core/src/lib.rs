// crates/med-gate-core/src/lib.rs
// ============================================================================
// Module: Med Gate Core
// Description: Host registry and authentication model for approved medical sources.
// Purpose: Provide the typed host table and pure auth-header logic shared by all crates.
// Dependencies: serde, base64, thiserror
// ============================================================================

//! ## Overview
//! This crate defines the approved-host registry and the per-host
//! authentication model for Med Gate. The registry is immutable process-wide
//! configuration seeded once at startup; auth-header construction and
//! credential validation are pure functions over that data.
//! Invariants:
//! - Host lookups never fail; an absent key yields `None`, not an error.
//! - Header building always produces a result; validation is a separate gate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod hosts;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::CLIENT_USER_AGENT;
pub use auth::Credentials;
pub use auth::DEFAULT_API_KEY_HEADER;
pub use auth::build_auth_headers;
pub use auth::validate_credentials;
pub use hosts::AuthScheme;
pub use hosts::HostRegistry;
pub use hosts::MedicalHost;
pub use hosts::RegistryError;
pub use hosts::builtin_registry;
