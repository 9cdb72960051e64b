// crates/med-gate-client/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: Injected transport capability for outbound HTTP requests.
// Purpose: Isolate network I/O behind one substitutable async operation.
// Dependencies: reqwest, async-trait, bytes
// ============================================================================

//! ## Overview
//! The transport performs exactly one HTTP round trip per call and reports
//! the raw status, headers, body bytes, and final (post-redirect) URL. It is
//! deliberately policy-free: no retries, no timeout enforcement, and no URL
//! normalization — callers own the request they hand in. The production
//! implementation rides on reqwest; tests substitute canned replies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// HTTP method for an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMethod {
    /// HTTP GET.
    #[default]
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl RequestMethod {
    /// Returns the wire form of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One outbound HTTP request handed to the transport.
///
/// # Invariants
/// - `url` is passed through verbatim; the transport performs no escaping
///   or normalization on behalf of the caller.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Absolute request URL.
    pub url: String,
    /// Request method.
    pub method: RequestMethod,
    /// Request headers, already merged by the caller.
    pub headers: BTreeMap<String, String>,
    /// Optional request body.
    pub body: Option<String>,
}

/// Raw reply from one HTTP round trip.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response headers; values that are not valid UTF-8 are dropped.
    pub headers: BTreeMap<String, String>,
    /// Response body bytes.
    pub body: Bytes,
    /// Final URL after any redirects.
    pub final_url: String,
}

impl TransportReply {
    /// Returns the content type header value when present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport-level failures for outbound requests.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Build(String),
    /// The request could not be completed (DNS, connect, protocol).
    #[error("http request failed: {0}")]
    Request(String),
    /// The response body could not be read.
    #[error("failed to read response: {0}")]
    Read(String),
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Injected capability performing one HTTP round trip.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes the request and returns the raw reply.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] on any transport-level failure. HTTP error
    /// statuses are reported in the reply, not as errors.
    async fn execute(&self, request: TransportRequest) -> Result<TransportReply, TransportError>;
}

// ============================================================================
// SECTION: Reqwest Implementation
// ============================================================================

/// Production transport backed by a shared reqwest client.
///
/// # Invariants
/// - No request timeout is configured; calls block until the peer responds
///   or the connection fails.
/// - Redirects follow reqwest defaults; the reply reports the final URL.
pub struct ReqwestTransport {
    /// Shared underlying HTTP client.
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the given outbound user agent.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] when the HTTP client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| TransportError::Build(err.to_string()))?;
        Ok(Self {
            client,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        let method = match request.method {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let response =
            builder.send().await.map_err(|err| TransportError::Request(err.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let mut headers = BTreeMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }
        let body =
            response.bytes().await.map_err(|err| TransportError::Read(err.to_string()))?;

        Ok(TransportReply {
            status,
            headers,
            body,
            final_url,
        })
    }
}
