// crates/med-gate-api/src/lib.rs
// ============================================================================
// Module: Med Gate API
// Description: HTTP gateway exposing fetch, search, and resolve endpoints.
// Purpose: Serve the stateless, CORS-open gateway surface over axum.
// Dependencies: axum, med-gate-client, med-gate-config, serde_json, tokio
// ============================================================================

//! ## Overview
//! The gateway serves three independent, stateless endpoints: a generic URL
//! fetch proxy, a keyword search, and a source-identifier resolve. Every
//! response carries permissive CORS headers, errors travel as JSON envelopes,
//! and outbound fetches go through an injected transport so the surface can
//! be exercised without sockets. A failure in one request never affects
//! another.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ApiAuditEvent;
pub use audit::ApiAuditSink;
pub use audit::NoopApiAuditSink;
pub use audit::StderrApiAuditSink;
pub use error::ApiError;
pub use server::ApiServer;
pub use server::ApiServerError;
pub use server::ServerState;
pub use server::router;
pub use telemetry::API_LATENCY_BUCKETS_MS;
pub use telemetry::ApiEndpoint;
pub use telemetry::ApiMetrics;
pub use telemetry::ApiOutcome;
pub use telemetry::NoopMetrics;
