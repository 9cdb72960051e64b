// crates/med-gate-api/src/telemetry.rs
// ============================================================================
// Module: API Telemetry
// Description: Observability hooks for gateway request handling.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for gateway request counters
//! and latency histograms. It is intentionally dependency-light so downstream
//! deployments can plug in Prometheus or OpenTelemetry without redesign.
//! Labels are closed enums, never raw request data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for gateway request histograms.
pub const API_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Gateway endpoint classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ApiEndpoint {
    /// Generic URL fetch proxy.
    Fetch,
    /// Keyword search.
    Search,
    /// Source identifier resolve.
    Resolve,
}

impl ApiEndpoint {
    /// Returns a stable label for the endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "/api/fetch",
            Self::Search => "/api/search",
            Self::Resolve => "/api/resolve",
        }
    }
}

/// Gateway request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ApiOutcome {
    /// Successful request.
    Ok,
    /// CORS preflight answered with an empty body.
    Preflight,
    /// Request failed parameter validation.
    Invalid,
    /// Request used an unsupported method.
    MethodNotAllowed,
    /// Upstream answered with an error status.
    Upstream,
    /// Outbound transport failed.
    Transport,
}

impl ApiOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Preflight => "preflight",
            Self::Invalid => "invalid",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Upstream => "upstream",
            Self::Transport => "transport",
        }
    }
}

// ============================================================================
// SECTION: Metrics Trait
// ============================================================================

/// Metrics interface for gateway request handling.
pub trait ApiMetrics: Send + Sync {
    /// Records one handled request with its outcome and latency.
    fn record_request(&self, endpoint: ApiEndpoint, outcome: ApiOutcome, latency: Duration);
}

/// Metrics implementation that discards all events.
pub struct NoopMetrics;

impl ApiMetrics for NoopMetrics {
    fn record_request(&self, _endpoint: ApiEndpoint, _outcome: ApiOutcome, _latency: Duration) {}
}
