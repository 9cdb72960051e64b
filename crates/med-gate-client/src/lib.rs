// crates/med-gate-client/src/lib.rs
// ============================================================================
// Module: Med Gate Client
// Description: Outbound HTTP transport and per-host fetch client.
// Purpose: Provide authenticated fetch dispatch against the approved host registry.
// Dependencies: med-gate-core, reqwest, async-trait, bytes, serde_json
// ============================================================================

//! ## Overview
//! This crate wraps one approved host behind [`SourceClient`]: construction
//! resolves the host and validates credentials (fail fast), and each request
//! merges auth headers with caller headers before one outbound round trip.
//! The transport is an injected capability behind [`HttpTransport`] so tests
//! and embedders can substitute canned responses.
//! Invariants:
//! - Upstream 4xx/5xx statuses are reported in the envelope, never raised.
//! - Only transport-level failures raise, wrapped with the host identity.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientError;
pub use client::FetchOptions;
pub use client::FetchResponse;
pub use client::ResponseBody;
pub use client::SourceClient;
pub use transport::HttpTransport;
pub use transport::RequestMethod;
pub use transport::ReqwestTransport;
pub use transport::TransportError;
pub use transport::TransportReply;
pub use transport::TransportRequest;
