// crates/med-gate-api/src/error.rs
// ============================================================================
// Module: API Errors
// Description: Gateway error taxonomy and JSON envelope mapping.
// Purpose: Map every failure class to a status code and error envelope.
// Dependencies: axum, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Gateway failures travel to callers as JSON envelopes of the form
//! `{"error": message, "details"?: detail}`. Validation failures map to 400,
//! unsupported methods to 405, upstream error statuses pass through
//! unaltered, and transport failures map to 500. None are retried and none
//! are fatal to the process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::StatusCode;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Gateway request failures surfaced to callers.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// A required request parameter is missing or invalid.
    #[error("{0}")]
    Validation(String),
    /// The request used an unsupported method.
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// The upstream answered with an error status.
    #[error("Failed to fetch: {reason}")]
    Upstream {
        /// Upstream status code, passed through unaltered.
        status: u16,
        /// Upstream failure reason.
        reason: String,
    },
    /// The outbound transport failed before an upstream status existed.
    #[error("Failed to fetch content")]
    Transport {
        /// Underlying failure detail.
        detail: String,
    },
}

impl ApiError {
    /// Returns the HTTP status for the error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Upstream {
                status, ..
            } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Transport {
                ..
            } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the JSON error envelope for the error.
    #[must_use]
    pub fn envelope(&self) -> Value {
        match self {
            Self::Transport {
                detail,
            } => json!({
                "error": self.to_string(),
                "details": detail,
            }),
            _ => json!({
                "error": self.to_string(),
            }),
        }
    }
}
