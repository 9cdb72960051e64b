// crates/med-gate-core/src/auth.rs
// ============================================================================
// Module: Host Authentication
// Description: Credential validation and auth-header construction per host scheme.
// Purpose: Provide pure, fail-safe header building gated by explicit validation.
// Dependencies: base64
// ============================================================================

//! ## Overview
//! This module builds outbound request headers for a host's declared
//! authentication scheme and validates that a credential bundle satisfies
//! that scheme. The two operations are deliberately separate: validation
//! gates client construction, while header building runs once per request
//! and always produces a result so that it cannot fail mid-flight.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::hosts::AuthScheme;
use crate::hosts::MedicalHost;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default header carrying an API key when the host names none.
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
/// Fixed client identifier sent with every outbound request.
pub const CLIENT_USER_AGENT: &str = "med-gate/0.1.0";

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Caller-supplied credential bundle for one host.
///
/// # Invariants
/// - Never persisted; lifetime is bounded by one client instance.
/// - Which fields are required is determined by the host's [`AuthScheme`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API key for `api_key` hosts.
    pub api_key: Option<String>,
    /// Bearer token for `oauth` hosts.
    pub token: Option<String>,
    /// Username for `basic` hosts.
    pub username: Option<String>,
    /// Password for `basic` hosts.
    pub password: Option<String>,
}

impl Credentials {
    /// Builds an API-key credential bundle.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Builds a bearer-token credential bundle.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Builds a basic-auth credential bundle.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }
}

// ============================================================================
// SECTION: Header Building
// ============================================================================

/// Builds outbound request headers for the host's authentication scheme.
///
/// Base headers (content type and client identifier) are always present.
/// Credential-derived headers are added only when the matching fields are
/// supplied; missing fields omit the header rather than raising an error,
/// because validation is a separate gate.
#[must_use]
pub fn build_auth_headers(
    host: &MedicalHost,
    credentials: &Credentials,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("User-Agent".to_string(), CLIENT_USER_AGENT.to_string());

    let Some(scheme) = &host.authentication else {
        return headers;
    };

    match scheme {
        AuthScheme::ApiKey {
            header_name,
        } => {
            if let Some(api_key) = &credentials.api_key {
                let header =
                    header_name.clone().unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
                headers.insert(header, api_key.clone());
            }
        }
        AuthScheme::OAuth => {
            if let Some(token) = &credentials.token {
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }
        }
        AuthScheme::Basic => {
            if let (Some(username), Some(password)) =
                (&credentials.username, &credentials.password)
            {
                let encoded = BASE64_STANDARD.encode(format!("{username}:{password}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
        }
    }

    headers
}

// ============================================================================
// SECTION: Credential Validation
// ============================================================================

/// Returns true when the credential bundle satisfies the host's scheme.
///
/// Hosts without an authentication scheme accept any bundle. The scheme enum
/// is closed, so every variant is handled explicitly here; a future variant
/// fails compilation rather than silently validating.
#[must_use]
pub fn validate_credentials(host: &MedicalHost, credentials: &Credentials) -> bool {
    let Some(scheme) = &host.authentication else {
        return true;
    };
    match scheme {
        AuthScheme::ApiKey {
            ..
        } => credentials.api_key.is_some(),
        AuthScheme::OAuth => credentials.token.is_some(),
        AuthScheme::Basic => {
            credentials.username.is_some() && credentials.password.is_some()
        }
    }
}
