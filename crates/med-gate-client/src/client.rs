// crates/med-gate-client/src/client.rs
// ============================================================================
// Module: Source Client
// Description: Per-host fetch client with fail-fast credential validation.
// Purpose: Merge auth and caller headers, dispatch one request, normalize the reply.
// Dependencies: med-gate-core, serde_json
// ============================================================================

//! ## Overview
//! A [`SourceClient`] wraps a single approved host for its whole lifetime.
//! Construction resolves the host key against the registry and validates the
//! credential bundle against the host's scheme, so an instance that exists
//! can always build headers. Each request performs one round trip through the
//! injected transport and normalizes the reply into a [`FetchResponse`]
//! envelope; upstream error statuses are data, not failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use med_gate_core::CLIENT_USER_AGENT;
use med_gate_core::Credentials;
use med_gate_core::HostRegistry;
use med_gate_core::MedicalHost;
use med_gate_core::build_auth_headers;
use med_gate_core::builtin_registry;
use med_gate_core::validate_credentials;
use serde_json::Value;
use thiserror::Error;

use crate::transport::HttpTransport;
use crate::transport::RequestMethod;
use crate::transport::ReqwestTransport;
use crate::transport::TransportReply;
use crate::transport::TransportRequest;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Per-request options for [`SourceClient::request`].
///
/// # Invariants
/// - `timeout` is carried for interface compatibility but is not enforced;
///   the transport issues the request without a deadline.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Request method; GET when unspecified.
    pub method: RequestMethod,
    /// Caller headers overlaid on auth headers; caller wins on collision.
    pub headers: BTreeMap<String, String>,
    /// Optional request body.
    pub body: Option<String>,
    /// Accepted but not enforced; no deadline is applied.
    pub timeout: Option<Duration>,
}

// ============================================================================
// SECTION: Response Envelope
// ============================================================================

/// Response body decoded by content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// Parsed JSON body for `application/json` replies.
    Json(Value),
    /// Opaque text body for everything else.
    Text(String),
}

impl ResponseBody {
    /// Returns the JSON value when the body was parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text when the body was treated as opaque text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

/// Normalized envelope returned for every fetch.
///
/// # Invariants
/// - `status` and `final_url` are passed through verbatim from the transport.
/// - Constructed fresh per call; never cached.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Decoded response body.
    pub body: ResponseBody,
    /// HTTP status code, including 4xx/5xx.
    pub status: u16,
    /// All response headers the transport surfaced.
    pub headers: BTreeMap<String, String>,
    /// Final URL after any redirects.
    pub final_url: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fetch client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The host key has no registry entry.
    #[error("unknown host: {key}")]
    UnknownHost {
        /// Unrecognized host key.
        key: String,
    },
    /// The credential bundle does not satisfy the host's scheme.
    #[error("invalid authentication configuration for {host}")]
    Authentication {
        /// Host key the credentials were rejected for.
        host: String,
    },
    /// The outbound request failed at the transport level.
    #[error("failed to fetch from {host}: {detail}")]
    Transport {
        /// Host name the request was addressed to.
        host: String,
        /// Underlying failure detail.
        detail: String,
    },
}

// ============================================================================
// SECTION: Source Client
// ============================================================================

/// Fetch client bound to one approved host.
///
/// # Invariants
/// - Only constructible when the credentials satisfy the host's scheme.
/// - Host descriptor and credentials are immutable for the client's lifetime.
pub struct SourceClient {
    /// Resolved host descriptor.
    host: MedicalHost,
    /// Credential bundle validated at construction.
    credentials: Credentials,
    /// Injected transport performing the round trips.
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceClient")
            .field("host", &self.host)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl SourceClient {
    /// Builds a client for a builtin host using the production transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownHost`] for an unregistered key,
    /// [`ClientError::Authentication`] when the credentials do not satisfy
    /// the host's scheme, and [`ClientError::Transport`] when the underlying
    /// HTTP client cannot be built.
    pub fn new(host_key: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(CLIENT_USER_AGENT).map_err(|err| {
            ClientError::Transport {
                host: host_key.to_string(),
                detail: err.to_string(),
            }
        })?;
        Self::with_transport(builtin_registry(), host_key, credentials, Arc::new(transport))
    }

    /// Builds a client against an explicit registry and transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownHost`] for an unregistered key and
    /// [`ClientError::Authentication`] when validation fails.
    pub fn with_transport(
        registry: &HostRegistry,
        host_key: &str,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientError> {
        let Some(host) = registry.lookup(host_key) else {
            return Err(ClientError::UnknownHost {
                key: host_key.to_string(),
            });
        };
        if !validate_credentials(host, &credentials) {
            return Err(ClientError::Authentication {
                host: host_key.to_string(),
            });
        }
        Ok(Self {
            host: host.clone(),
            credentials,
            transport,
        })
    }

    /// Returns the resolved host descriptor.
    #[must_use]
    pub const fn host(&self) -> &MedicalHost {
        &self.host
    }

    /// Performs one request against the host and normalizes the reply.
    ///
    /// The endpoint is appended to the host base URL verbatim; supplying a
    /// well-formed relative path is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on transport failure or when a
    /// JSON-typed body cannot be parsed. HTTP error statuses are reported in
    /// the envelope, never as errors.
    pub async fn request(
        &self,
        endpoint: &str,
        options: FetchOptions,
    ) -> Result<FetchResponse, ClientError> {
        let url = format!("{}{}", self.host.base_url, endpoint);
        let mut headers = build_auth_headers(&self.host, &self.credentials);
        for (name, value) in options.headers {
            headers.insert(name, value);
        }

        let reply = self
            .transport
            .execute(TransportRequest {
                url,
                method: options.method,
                headers,
                body: options.body,
            })
            .await
            .map_err(|err| self.wrap(err.to_string()))?;

        let body = self.decode_body(&reply)?;
        Ok(FetchResponse {
            body,
            status: reply.status,
            headers: reply.headers,
            final_url: reply.final_url,
        })
    }

    /// Performs a GET request with optional extra headers.
    ///
    /// # Errors
    ///
    /// Propagates [`ClientError`] from [`Self::request`].
    pub async fn get(
        &self,
        endpoint: &str,
        headers: BTreeMap<String, String>,
    ) -> Result<FetchResponse, ClientError> {
        self.request(endpoint, FetchOptions {
            method: RequestMethod::Get,
            headers,
            ..FetchOptions::default()
        })
        .await
    }

    /// Performs a POST request with a body and optional extra headers.
    ///
    /// # Errors
    ///
    /// Propagates [`ClientError`] from [`Self::request`].
    pub async fn post(
        &self,
        endpoint: &str,
        body: String,
        headers: BTreeMap<String, String>,
    ) -> Result<FetchResponse, ClientError> {
        self.request(endpoint, FetchOptions {
            method: RequestMethod::Post,
            headers,
            body: Some(body),
            ..FetchOptions::default()
        })
        .await
    }

    /// Decodes the reply body by content type.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when a JSON-typed body fails to
    /// parse; decode failures surface the same way as network failures.
    fn decode_body(&self, reply: &TransportReply) -> Result<ResponseBody, ClientError> {
        let is_json = reply
            .content_type()
            .is_some_and(|content_type| content_type.contains("application/json"));
        if is_json {
            let value: Value = serde_json::from_slice(&reply.body)
                .map_err(|err| self.wrap(format!("invalid json body: {err}")))?;
            return Ok(ResponseBody::Json(value));
        }
        Ok(ResponseBody::Text(String::from_utf8_lossy(&reply.body).into_owned()))
    }

    /// Wraps a failure detail with the host identity.
    fn wrap(&self, detail: String) -> ClientError {
        ClientError::Transport {
            host: self.host.name.clone(),
            detail,
        }
    }
}
