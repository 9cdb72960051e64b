// crates/med-gate-api/src/server.rs
// ============================================================================
// Module: Gateway Server
// Description: Axum server and handlers for the three gateway endpoints.
// Purpose: Serve fetch, search, and resolve with CORS and JSON envelopes.
// Dependencies: axum, med-gate-client, med-gate-config, serde_json, tokio
// ============================================================================

//! ## Overview
//! The gateway server routes `/api/fetch`, `/api/search`, and `/api/resolve`.
//! Each handler dispatches on the request method itself so that preflight
//! `OPTIONS` answers 200 with an empty body and anything other than `GET`
//! answers 405, always with the permissive CORS header set. The fetch
//! endpoint proxies one outbound request through the injected transport;
//! search and resolve synthesize their payloads from the query parameter and
//! touch neither the host registry nor the auth layer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::any;
use med_gate_client::HttpTransport;
use med_gate_client::RequestMethod;
use med_gate_client::ReqwestTransport;
use med_gate_client::TransportRequest;
use med_gate_config::MedGateConfig;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::audit::ApiAuditEvent;
use crate::audit::ApiAuditSink;
use crate::audit::StderrApiAuditSink;
use crate::error::ApiError;
use crate::telemetry::ApiEndpoint;
use crate::telemetry::ApiMetrics;
use crate::telemetry::ApiOutcome;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Methods advertised to CORS preflight requests.
const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
/// Headers advertised to CORS preflight requests.
const CORS_ALLOW_HEADERS: &str = "Content-Type";

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state for gateway handlers.
pub struct ServerState {
    /// Transport performing outbound fetches.
    pub transport: Arc<dyn HttpTransport>,
    /// Audit sink receiving one event per handled request.
    pub audit: Arc<dyn ApiAuditSink>,
    /// Metrics sink receiving request counters and latencies.
    pub metrics: Arc<dyn ApiMetrics>,
}

// ============================================================================
// SECTION: Gateway Server
// ============================================================================

/// Gateway server instance.
pub struct ApiServer {
    /// Validated gateway configuration.
    config: MedGateConfig,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl ApiServer {
    /// Builds a server from configuration with production collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when the configuration is invalid or the
    /// outbound transport cannot be constructed.
    pub fn from_config(config: MedGateConfig) -> Result<Self, ApiServerError> {
        config.validate().map_err(|err| ApiServerError::Config(err.to_string()))?;
        let transport = ReqwestTransport::new(&config.outbound.user_agent)
            .map_err(|err| ApiServerError::Init(err.to_string()))?;
        let state = Arc::new(ServerState {
            transport: Arc::new(transport),
            audit: Arc::new(StderrApiAuditSink),
            metrics: Arc::new(NoopMetrics),
        });
        Ok(Self {
            config,
            state,
        })
    }

    /// Builds a server from configuration and explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::Config`] when the configuration is invalid.
    pub fn with_state(
        config: MedGateConfig,
        state: Arc<ServerState>,
    ) -> Result<Self, ApiServerError> {
        config.validate().map_err(|err| ApiServerError::Config(err.to_string()))?;
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests on the configured bind address until failure.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ApiServerError> {
        let addr: SocketAddr =
            self.config.bind_addr().map_err(|err| ApiServerError::Config(err.to_string()))?;
        let app = router(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ApiServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ApiServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the gateway router over the shared state.
#[must_use]
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/fetch", any(fetch_route))
        .route("/api/search", any(search_route))
        .route("/api/resolve", any(resolve_route))
        .with_state(state)
}

// ============================================================================
// SECTION: Route Handlers
// ============================================================================

/// Query parameters as a plain string map.
type Params = BTreeMap<String, String>;

/// Routes `/api/fetch` requests.
async fn fetch_route(
    State(state): State<Arc<ServerState>>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    let started = Instant::now();
    let result = handle_fetch(&state, &method, &params).await;
    finish(&state, ApiEndpoint::Fetch, started, result)
}

/// Routes `/api/search` requests.
async fn search_route(
    State(state): State<Arc<ServerState>>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    let started = Instant::now();
    let result = handle_search(&method, &params);
    finish(&state, ApiEndpoint::Search, started, result)
}

/// Routes `/api/resolve` requests.
async fn resolve_route(
    State(state): State<Arc<ServerState>>,
    method: Method,
    Query(params): Query<Params>,
) -> Response {
    let started = Instant::now();
    let result = handle_resolve(&method, &params);
    finish(&state, ApiEndpoint::Resolve, started, result)
}

// ============================================================================
// SECTION: Endpoint Logic
// ============================================================================

/// Successful handler reply prior to CORS decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteReply {
    /// Empty-bodied preflight answer.
    Preflight,
    /// JSON payload answer.
    Json(Value),
}

/// Handles the generic URL fetch endpoint.
async fn handle_fetch(
    state: &ServerState,
    method: &Method,
    params: &Params,
) -> Result<RouteReply, ApiError> {
    if let Some(reply) = dispatch_method(method)? {
        return Ok(reply);
    }
    let Some(url) = params.get("url") else {
        return Err(ApiError::Validation("URL parameter is required".to_string()));
    };

    let reply = state
        .transport
        .execute(TransportRequest {
            url: url.clone(),
            method: RequestMethod::Get,
            headers: BTreeMap::new(),
            body: None,
        })
        .await
        .map_err(|err| ApiError::Transport {
            detail: err.to_string(),
        })?;

    if !(200..300).contains(&reply.status) {
        return Err(ApiError::Upstream {
            status: reply.status,
            reason: reason_phrase(reply.status),
        });
    }

    let is_json = reply
        .content_type()
        .is_some_and(|content_type| content_type.contains("application/json"));
    if is_json {
        let value: Value =
            serde_json::from_slice(&reply.body).map_err(|err| ApiError::Transport {
                detail: format!("invalid json body: {err}"),
            })?;
        return Ok(RouteReply::Json(value));
    }
    let text = String::from_utf8_lossy(&reply.body).into_owned();
    Ok(RouteReply::Json(json!({ "content": text })))
}

/// Handles the keyword search endpoint.
///
/// The result is a fixed demonstration entry templated with the query; no
/// index or upstream is consulted.
fn handle_search(method: &Method, params: &Params) -> Result<RouteReply, ApiError> {
    if let Some(reply) = dispatch_method(method)? {
        return Ok(reply);
    }
    let Some(query) = params.get("query") else {
        return Err(ApiError::Validation("Query parameter is required".to_string()));
    };
    Ok(RouteReply::Json(json!({
        "query": query,
        "sources": [
            {
                "id": "1",
                "name": "Example Medical Source",
                "url": "https://example.com",
                "description": "Sample medical source for demonstration",
            }
        ],
    })))
}

/// Handles the source identifier resolve endpoint.
///
/// The descriptor is synthesized from the identifier; no upstream is
/// consulted.
fn handle_resolve(method: &Method, params: &Params) -> Result<RouteReply, ApiError> {
    if let Some(reply) = dispatch_method(method)? {
        return Ok(reply);
    }
    let Some(id) = params.get("id") else {
        return Err(ApiError::Validation("ID parameter is required".to_string()));
    };
    Ok(RouteReply::Json(json!({
        "id": id,
        "name": format!("Medical Source {id}"),
        "url": format!("https://example.com/source/{id}"),
        "description": format!("Detailed information for medical source {id}"),
        "type": "medical_journal",
        "lastUpdated": now_rfc3339(),
        "verified": true,
        "categories": ["cardiology", "general_medicine"],
        "metadata": {
            "publisher": "Example Medical Publisher",
            "impact_factor": "4.5",
            "peer_reviewed": true,
        },
    })))
}

/// Dispatches on the request method shared by all endpoints.
///
/// Returns the preflight reply for `OPTIONS`, passes `GET` through, and
/// rejects everything else.
///
/// # Errors
///
/// Returns [`ApiError::MethodNotAllowed`] for non-GET, non-OPTIONS methods.
fn dispatch_method(method: &Method) -> Result<Option<RouteReply>, ApiError> {
    if *method == Method::OPTIONS {
        return Ok(Some(RouteReply::Preflight));
    }
    if *method == Method::GET {
        return Ok(None);
    }
    Err(ApiError::MethodNotAllowed)
}

// ============================================================================
// SECTION: Response Assembly
// ============================================================================

/// Converts a handler result into a response and records observability events.
fn finish(
    state: &ServerState,
    endpoint: ApiEndpoint,
    started: Instant,
    result: Result<RouteReply, ApiError>,
) -> Response {
    let (response, outcome, status, detail) = match result {
        Ok(RouteReply::Preflight) => {
            let response = (StatusCode::OK, cors_headers(), String::new()).into_response();
            (response, ApiOutcome::Preflight, StatusCode::OK.as_u16(), None)
        }
        Ok(RouteReply::Json(value)) => {
            let response = (StatusCode::OK, cors_headers(), axum::Json(value)).into_response();
            (response, ApiOutcome::Ok, StatusCode::OK.as_u16(), None)
        }
        Err(error) => {
            let status = error.status();
            let outcome = outcome_of(&error);
            let detail = error.to_string();
            let response = (status, cors_headers(), axum::Json(error.envelope())).into_response();
            (response, outcome, status.as_u16(), Some(detail))
        }
    };
    state.audit.record(&ApiAuditEvent::request(endpoint, outcome, status, detail));
    state.metrics.record_request(endpoint, outcome, started.elapsed());
    response
}

/// Classifies an error for telemetry labels.
fn outcome_of(error: &ApiError) -> ApiOutcome {
    match error {
        ApiError::Validation(_) => ApiOutcome::Invalid,
        ApiError::MethodNotAllowed => ApiOutcome::MethodNotAllowed,
        ApiError::Upstream {
            ..
        } => ApiOutcome::Upstream,
        ApiError::Transport {
            ..
        } => ApiOutcome::Transport,
    }
}

/// Builds the permissive CORS header set carried by every response.
fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert("Access-Control-Allow-Methods", HeaderValue::from_static(CORS_ALLOW_METHODS));
    headers.insert("Access-Control-Allow-Headers", HeaderValue::from_static(CORS_ALLOW_HEADERS));
    headers
}

/// Returns the canonical reason phrase for a status code.
fn reason_phrase(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map_or_else(|| status.to_string(), str::to_string)
}

/// Returns the current UTC time in RFC 3339 form.
fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| OffsetDateTime::UNIX_EPOCH.to_string())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway server lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
