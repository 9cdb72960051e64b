// crates/med-gate-core/src/hosts.rs
// ============================================================================
// Module: Approved Host Registry
// Description: Static table of approved medical information hosts.
// Purpose: Provide immutable host descriptors with lookup and filter operations.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The host registry maps short host keys (for example `pubmed`) to immutable
//! host descriptors: base URL, trust flag, category set, and an optional
//! authentication scheme. The builtin table is seeded once at process start
//! and is safe for concurrent readers. Lookups are total: an absent key
//! yields `None` and filters yield empty sequences, never errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Auth Scheme
// ============================================================================

/// Authentication scheme declared by a host.
///
/// # Invariants
/// - The set of schemes is closed; adding a variant requires explicit
///   handling in credential validation and header building.
/// - Wire form uses a `type` tag with values `api_key`, `oauth`, and `basic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthScheme {
    /// API key sent in a configurable request header.
    ApiKey {
        /// Header carrying the key; `X-API-Key` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header_name: Option<String>,
    },
    /// OAuth bearer token in the `Authorization` header.
    #[serde(rename = "oauth")]
    OAuth,
    /// HTTP basic authentication with username and password.
    Basic,
}

// ============================================================================
// SECTION: Host Descriptor
// ============================================================================

/// Descriptor for an approved medical information host.
///
/// # Invariants
/// - Immutable once registered; the registry hands out shared references.
/// - `rate_limit` is inert metadata (requests per second); nothing enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHost {
    /// Human-readable host name.
    pub name: String,
    /// Base URL that endpoint paths are appended to.
    pub base_url: String,
    /// True when the host is vetted for medical content.
    pub trusted: bool,
    /// Content categories served by the host.
    pub categories: BTreeSet<String>,
    /// Advisory requests-per-second limit; not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    /// Authentication scheme required by the host, when any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthScheme>,
}

impl MedicalHost {
    /// Returns true when the host serves the given category.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Host registry registration errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A host key was registered twice.
    #[error("host already registered: {key}")]
    DuplicateHost {
        /// Offending host key.
        key: String,
    },
}

// ============================================================================
// SECTION: Host Registry
// ============================================================================

/// Registry of approved hosts keyed by short host key.
///
/// # Invariants
/// - Host keys are unique within the registry.
/// - Descriptors are never mutated after registration.
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    /// Host descriptors keyed by short host key.
    hosts: BTreeMap<String, MedicalHost>,
}

impl HostRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hosts: BTreeMap::new(),
        }
    }

    /// Registers a host under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateHost`] when the key is already taken.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        host: MedicalHost,
    ) -> Result<(), RegistryError> {
        let key = key.into();
        if self.hosts.contains_key(&key) {
            return Err(RegistryError::DuplicateHost {
                key,
            });
        }
        self.hosts.insert(key, host);
        Ok(())
    }

    /// Looks up a host descriptor by exact key match.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&MedicalHost> {
        self.hosts.get(key)
    }

    /// Returns every host flagged as trusted.
    #[must_use]
    pub fn trusted_hosts(&self) -> Vec<&MedicalHost> {
        self.hosts.values().filter(|host| host.trusted).collect()
    }

    /// Returns every host serving the given category.
    #[must_use]
    pub fn hosts_by_category(&self, category: &str) -> Vec<&MedicalHost> {
        self.hosts.values().filter(|host| host.has_category(category)).collect()
    }

    /// Iterates over registered `(key, host)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MedicalHost)> {
        self.hosts.iter().map(|(key, host)| (key.as_str(), host))
    }

    /// Returns the number of registered hosts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Returns true when no hosts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Builds the builtin table of approved medical hosts.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (key, host) in builtin_hosts() {
            // Builtin keys are distinct; duplicate registration cannot occur.
            let _ = registry.register(key, host);
        }
        registry
    }
}

/// Returns the builtin host table entries.
fn builtin_hosts() -> Vec<(&'static str, MedicalHost)> {
    vec![
        (
            "pubmed",
            MedicalHost {
                name: "PubMed".to_string(),
                base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/".to_string(),
                trusted: true,
                categories: categories(&["research", "articles", "clinical_trials"]),
                rate_limit: Some(3),
                authentication: None,
            },
        ),
        (
            "cochrane",
            MedicalHost {
                name: "Cochrane Library".to_string(),
                base_url: "https://api.cochranelibrary.com/".to_string(),
                trusted: true,
                categories: categories(&["systematic_reviews", "meta_analysis"]),
                rate_limit: None,
                authentication: Some(AuthScheme::ApiKey {
                    header_name: Some("Authorization".to_string()),
                }),
            },
        ),
        (
            "nejm",
            MedicalHost {
                name: "New England Journal of Medicine".to_string(),
                base_url: "https://www.nejm.org/api/".to_string(),
                trusted: true,
                categories: categories(&["peer_reviewed", "clinical_medicine"]),
                rate_limit: None,
                authentication: Some(AuthScheme::ApiKey {
                    header_name: None,
                }),
            },
        ),
        (
            "who",
            MedicalHost {
                name: "World Health Organization".to_string(),
                base_url: "https://www.who.int/api/".to_string(),
                trusted: true,
                categories: categories(&["guidelines", "public_health", "global_health"]),
                rate_limit: None,
                authentication: None,
            },
        ),
    ]
}

/// Collects a category slice into the descriptor set form.
fn categories(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|entry| (*entry).to_string()).collect()
}

// ============================================================================
// SECTION: Process-Wide Registry
// ============================================================================

/// Lazily initialized builtin registry shared across the process.
static BUILTIN_REGISTRY: OnceLock<HostRegistry> = OnceLock::new();

/// Returns the process-wide builtin host registry.
///
/// The table is initialized on first access and is read-only thereafter,
/// making it safe for concurrent readers.
#[must_use]
pub fn builtin_registry() -> &'static HostRegistry {
    BUILTIN_REGISTRY.get_or_init(HostRegistry::builtin)
}
