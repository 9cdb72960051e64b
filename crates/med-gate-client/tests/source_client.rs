// crates/med-gate-client/tests/source_client.rs
// ============================================================================
// Module: Source Client Tests
// Description: Tests for the per-host fetch client over a canned transport.
// Purpose: Validate construction gating, header merging, and envelope decoding.
// Dependencies: med-gate-client, med-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Tests the source client for:
//! - Construction: unknown host and credential validation failures
//! - Request shaping: URL concatenation, auth headers, caller-header overlay
//! - Envelope decoding: JSON branch, text branch, status passthrough
//! - Error handling: wrapped transport failures, invalid JSON bodies

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use med_gate_client::ClientError;
use med_gate_client::FetchOptions;
use med_gate_client::HttpTransport;
use med_gate_client::RequestMethod;
use med_gate_client::SourceClient;
use med_gate_client::TransportError;
use med_gate_client::TransportReply;
use med_gate_client::TransportRequest;
use med_gate_core::AuthScheme;
use med_gate_core::Credentials;
use med_gate_core::HostRegistry;
use med_gate_core::MedicalHost;
use serde_json::json;

// ============================================================================
// SECTION: Test Transport
// ============================================================================

/// Canned outcome returned by the test transport.
enum CannedOutcome {
    /// Return a fixed reply.
    Reply {
        /// Reply status code.
        status: u16,
        /// Reply content type header, when any.
        content_type: Option<&'static str>,
        /// Reply body bytes.
        body: &'static str,
    },
    /// Fail with a transport error carrying this detail.
    Fail(&'static str),
}

/// Transport double recording requests and returning canned outcomes.
struct CannedTransport {
    /// Outcome template for every call.
    outcome: CannedOutcome,
    /// Requests observed, in call order.
    seen: Mutex<Vec<TransportRequest>>,
}

impl CannedTransport {
    /// Builds a double that replies with the given status/body.
    fn replying(status: u16, content_type: Option<&'static str>, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            outcome: CannedOutcome::Reply {
                status,
                content_type,
                body,
            },
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Builds a double that fails every call.
    fn failing(detail: &'static str) -> Arc<Self> {
        Arc::new(Self {
            outcome: CannedOutcome::Fail(detail),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Returns the single recorded request.
    fn only_request(&self) -> TransportRequest {
        let seen = self.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        seen[0].clone()
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportReply, TransportError> {
        let final_url = request.url.clone();
        self.seen.lock().unwrap().push(request);
        match &self.outcome {
            CannedOutcome::Reply {
                status,
                content_type,
                body,
            } => {
                let mut headers = BTreeMap::new();
                if let Some(content_type) = content_type {
                    headers.insert("content-type".to_string(), (*content_type).to_string());
                }
                Ok(TransportReply {
                    status: *status,
                    headers,
                    body: Bytes::from_static(body.as_bytes()),
                    final_url,
                })
            }
            CannedOutcome::Fail(detail) => Err(TransportError::Request((*detail).to_string())),
        }
    }
}

// ============================================================================
// SECTION: Test Fixtures
// ============================================================================

/// Builds a registry with one host per authentication scheme.
fn fixture_registry() -> HostRegistry {
    let mut registry = HostRegistry::new();
    registry
        .register("open", MedicalHost {
            name: "Open Host".to_string(),
            base_url: "https://open.example/api/".to_string(),
            trusted: true,
            categories: BTreeSet::new(),
            rate_limit: None,
            authentication: None,
        })
        .unwrap();
    registry
        .register("keyed", MedicalHost {
            name: "Keyed Host".to_string(),
            base_url: "https://keyed.example/".to_string(),
            trusted: true,
            categories: BTreeSet::new(),
            rate_limit: None,
            authentication: Some(AuthScheme::ApiKey {
                header_name: None,
            }),
        })
        .unwrap();
    registry
}

/// Builds a client for the open host over the given transport.
fn open_client(transport: Arc<CannedTransport>) -> SourceClient {
    SourceClient::with_transport(&fixture_registry(), "open", Credentials::default(), transport)
        .unwrap()
}

// ============================================================================
// SECTION: Construction Tests
// ============================================================================

/// Tests that an unknown host key fails construction.
#[test]
fn unknown_host_fails_construction() {
    let transport = CannedTransport::replying(200, None, "");
    let error = SourceClient::with_transport(
        &fixture_registry(),
        "lancet",
        Credentials::default(),
        transport,
    )
    .unwrap_err();
    let ClientError::UnknownHost {
        key,
    } = error
    else {
        panic!("expected unknown host error");
    };
    assert_eq!(key, "lancet");
}

/// Tests that missing required credentials fail construction.
#[test]
fn missing_credentials_fail_construction() {
    let transport = CannedTransport::replying(200, None, "");
    let error = SourceClient::with_transport(
        &fixture_registry(),
        "keyed",
        Credentials::default(),
        transport,
    )
    .unwrap_err();
    let ClientError::Authentication {
        host,
    } = error
    else {
        panic!("expected authentication error");
    };
    assert_eq!(host, "keyed");
}

/// Tests that satisfied credentials construct successfully.
#[test]
fn satisfied_credentials_construct() {
    let transport = CannedTransport::replying(200, None, "");
    let client = SourceClient::with_transport(
        &fixture_registry(),
        "keyed",
        Credentials::api_key("k"),
        transport,
    )
    .unwrap();
    assert_eq!(client.host().name, "Keyed Host");
}

// ============================================================================
// SECTION: Request Shaping Tests
// ============================================================================

/// Tests that the endpoint is appended to the base URL verbatim.
#[tokio::test]
async fn endpoint_concatenates_verbatim() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = open_client(Arc::clone(&transport));
    client.get("esearch.fcgi?db=pubmed", BTreeMap::new()).await.unwrap();
    let request = transport.only_request();
    assert_eq!(request.url, "https://open.example/api/esearch.fcgi?db=pubmed");
    assert_eq!(request.method, RequestMethod::Get);
}

/// Tests that auth headers reach the transport for keyed hosts.
#[tokio::test]
async fn auth_headers_reach_transport() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = SourceClient::with_transport(
        &fixture_registry(),
        "keyed",
        Credentials::api_key("secret"),
        Arc::<CannedTransport>::clone(&transport),
    )
    .unwrap();
    client.get("records", BTreeMap::new()).await.unwrap();
    let request = transport.only_request();
    assert_eq!(request.headers.get("X-API-Key").map(String::as_str), Some("secret"));
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
}

/// Tests that caller headers win over auth headers on collision.
#[tokio::test]
async fn caller_headers_win_on_collision() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = open_client(Arc::clone(&transport));
    let mut extra = BTreeMap::new();
    extra.insert("Content-Type".to_string(), "text/plain".to_string());
    extra.insert("X-Trace".to_string(), "abc".to_string());
    client.get("records", extra).await.unwrap();
    let request = transport.only_request();
    assert_eq!(request.headers.get("Content-Type").map(String::as_str), Some("text/plain"));
    assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("abc"));
}

/// Tests that post forwards the method and body.
#[tokio::test]
async fn post_forwards_method_and_body() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = open_client(Arc::clone(&transport));
    client.post("submit", "{\"q\":1}".to_string(), BTreeMap::new()).await.unwrap();
    let request = transport.only_request();
    assert_eq!(request.method, RequestMethod::Post);
    assert_eq!(request.body.as_deref(), Some("{\"q\":1}"));
}

// ============================================================================
// SECTION: Envelope Tests
// ============================================================================

/// Tests that a JSON content type parses the body into a JSON value.
#[tokio::test]
async fn json_content_type_parses_body() {
    let transport =
        CannedTransport::replying(200, Some("application/json; charset=utf-8"), "{\"ok\":true}");
    let client = open_client(transport);
    let response = client.get("records", BTreeMap::new()).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.as_json(), Some(&json!({"ok": true})));
}

/// Tests that a non-JSON content type yields opaque text.
#[tokio::test]
async fn non_json_content_type_yields_text() {
    let transport = CannedTransport::replying(200, Some("text/html"), "<p>hi</p>");
    let client = open_client(transport);
    let response = client.get("page", BTreeMap::new()).await.unwrap();
    assert_eq!(response.body.as_text(), Some("<p>hi</p>"));
}

/// Tests that a missing content type yields opaque text.
#[tokio::test]
async fn missing_content_type_yields_text() {
    let transport = CannedTransport::replying(200, None, "plain");
    let client = open_client(transport);
    let response = client.get("page", BTreeMap::new()).await.unwrap();
    assert_eq!(response.body.as_text(), Some("plain"));
}

/// Tests that upstream error statuses are reported, not raised.
#[tokio::test]
async fn error_status_is_reported_not_raised() {
    let transport = CannedTransport::replying(503, Some("text/plain"), "unavailable");
    let client = open_client(transport);
    let response = client.get("down", BTreeMap::new()).await.unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body.as_text(), Some("unavailable"));
}

/// Tests that the final URL is passed through from the transport.
#[tokio::test]
async fn final_url_passes_through() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = open_client(transport);
    let response = client.get("records", BTreeMap::new()).await.unwrap();
    assert_eq!(response.final_url, "https://open.example/api/records");
}

// ============================================================================
// SECTION: Failure Tests
// ============================================================================

/// Tests that transport failures are wrapped with the host identity.
#[tokio::test]
async fn transport_failure_is_wrapped() {
    let transport = CannedTransport::failing("connection refused");
    let client = open_client(transport);
    let error = client.get("records", BTreeMap::new()).await.unwrap_err();
    let ClientError::Transport {
        host,
        detail,
    } = error
    else {
        panic!("expected transport error");
    };
    assert_eq!(host, "Open Host");
    assert!(detail.contains("connection refused"));
}

/// Tests that an unparseable JSON body is reported as a wrapped failure.
#[tokio::test]
async fn invalid_json_body_is_wrapped() {
    let transport = CannedTransport::replying(200, Some("application/json"), "not-json");
    let client = open_client(transport);
    let error = client.get("records", BTreeMap::new()).await.unwrap_err();
    assert!(matches!(
        error,
        ClientError::Transport {
            ..
        }
    ));
}

/// Tests that the unused timeout option does not affect dispatch.
#[tokio::test]
async fn timeout_option_is_inert() {
    let transport = CannedTransport::replying(200, None, "ok");
    let client = open_client(Arc::clone(&transport));
    let options = FetchOptions {
        timeout: Some(std::time::Duration::from_millis(1)),
        ..FetchOptions::default()
    };
    let response = client.request("records", options).await.unwrap();
    assert_eq!(response.status, 200);
}
