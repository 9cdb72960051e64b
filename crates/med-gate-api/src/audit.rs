// crates/med-gate-api/src/audit.rs
// ============================================================================
// Module: API Audit Logging
// Description: Structured audit events for gateway request handling.
// Purpose: Emit one JSON line per handled request without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks for gateway request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. Events carry labels
//! and error details only, never fetched content.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use serde::Serialize;

use crate::telemetry::ApiEndpoint;
use crate::telemetry::ApiOutcome;

// ============================================================================
// SECTION: Event Types
// ============================================================================

/// Gateway audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Endpoint label.
    pub endpoint: &'static str,
    /// Outcome label.
    pub outcome: &'static str,
    /// HTTP status returned to the caller.
    pub status: u16,
    /// Error detail for failed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiAuditEvent {
    /// Builds a request event from handler labels.
    #[must_use]
    pub fn request(
        endpoint: ApiEndpoint,
        outcome: ApiOutcome,
        status: u16,
        detail: Option<String>,
    ) -> Self {
        Self {
            event: "gateway_request",
            endpoint: endpoint.as_str(),
            outcome: outcome.as_str(),
            status,
            detail,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for gateway request events.
pub trait ApiAuditSink: Send + Sync {
    /// Records an audit event.
    fn record(&self, event: &ApiAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrApiAuditSink;

impl ApiAuditSink for StderrApiAuditSink {
    fn record(&self, event: &ApiAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink for tests and embedders with their own logging.
pub struct NoopApiAuditSink;

impl ApiAuditSink for NoopApiAuditSink {
    fn record(&self, _event: &ApiAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
