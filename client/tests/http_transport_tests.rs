// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Verified operations over HTTP against an axum server backed by a
//! proving in-memory ledger.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use ledger_trust::fixtures::{Blake3Primitives, LedgerError, MemoryLedger};
use ledger_trust::wire::{
    ReadRequest, ReadResponse, ReferenceRequest, ServerState, TamperReport, WriteRequest,
    WriteResponse,
};
use ledger_trust::MemoryStateStore;
use ledger_trust_client::network::http::API_KEY_HEADER;
use ledger_trust_client::{ClientConfig, ClientError, HttpTransport, LedgerClient, TransportFailure};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

const API_KEY: &str = "test-key";

type Shared = Arc<Mutex<MemoryLedger>>;
type ApiError = (StatusCode, Json<serde_json::Value>);

fn authorize(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(API_KEY) => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid api key" })))),
    }
}

fn ledger_error(err: LedgerError) -> ApiError {
    let status = match err {
        LedgerError::KeyNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

async fn set(
    State(ledger): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<WriteRequest>,
) -> Result<Json<WriteResponse>, ApiError> {
    authorize(&headers)?;
    ledger.lock().await.write(&req).map(Json).map_err(ledger_error)
}

async fn set_reference(
    State(ledger): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<ReferenceRequest>,
) -> Result<Json<WriteResponse>, ApiError> {
    authorize(&headers)?;
    ledger.lock().await.set_reference(&req).map(Json).map_err(ledger_error)
}

async fn read(
    State(ledger): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<ReadRequest>,
) -> Result<Json<ReadResponse>, ApiError> {
    authorize(&headers)?;
    ledger.lock().await.read(&req).map(Json).map_err(ledger_error)
}

async fn state(State(ledger): State<Shared>, headers: HeaderMap) -> Result<Json<ServerState>, ApiError> {
    authorize(&headers)?;
    Ok(Json(ledger.lock().await.state()))
}

async fn report_tamper(
    State(ledger): State<Shared>,
    headers: HeaderMap,
    Json(report): Json<TamperReport>,
) -> Result<StatusCode, ApiError> {
    authorize(&headers)?;
    ledger.lock().await.report_tamper(report);
    Ok(StatusCode::NO_CONTENT)
}

async fn spawn_server() -> (u16, Shared) {
    let ledger: Shared = Arc::new(Mutex::new(MemoryLedger::new()));
    let app = Router::new()
        .route("/v1/verified/set", post(set))
        .route("/v1/verified/set-reference", post(set_reference))
        .route("/v1/verified/get", post(read))
        .route("/v1/state", get(state))
        .route("/v1/report-tamper", post(report_tamper))
        .with_state(ledger.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (port, ledger)
}

fn http_client(
    port: u16,
    api_key: &str,
) -> LedgerClient<HttpTransport, Blake3Primitives, MemoryStateStore> {
    let config = ClientConfig {
        server_url: "127.0.0.1".into(),
        server_port: port,
        use_tls: false,
        api_key: Some(api_key.into()),
        ..ClientConfig::default()
    };
    let transport = HttpTransport::from_config(&config);
    LedgerClient::new(config, transport, Blake3Primitives, MemoryStateStore::new())
}

#[tokio::test]
async fn test_verified_roundtrip_over_http() {
    let (port, ledger) = spawn_server().await;
    let client = http_client(port, API_KEY);
    assert_eq!(client.server_identity(), format!("127.0.0.1:{}", port));

    let tx = client.verified_set("k", "v1").await.unwrap();
    assert_eq!(tx.id, 1);
    client.verified_set("k", "v2").await.unwrap();
    client.verified_set_reference("alias", "k", 1).await.unwrap();

    let old = client.verified_get_at("k", 1).await.unwrap();
    assert_eq!(old.value, b"v1");
    let alias = client.verified_get("alias").await.unwrap();
    assert_eq!(alias.value, b"v1");

    let anchor = client.current_anchor().unwrap().unwrap();
    assert_eq!(anchor.tx_id, 3);
    assert_eq!(anchor.tx_hash, ledger.lock().await.alh(3).unwrap());
}

#[tokio::test]
async fn test_http_errors_are_transport_failures() {
    let (port, _ledger) = spawn_server().await;
    let client = http_client(port, API_KEY);

    let err = client.verified_get("missing").await.unwrap_err();
    match err {
        ClientError::Transport(TransportFailure::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "key not found");
        }
        other => panic!("unexpected error: {other}"),
    }

    let unauthorized = http_client(port, "wrong-key");
    let err = unauthorized.verified_set("k", "v").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportFailure::Status { status: 401, .. })
    ));
    assert!(err.is_retryable());
    assert!(unauthorized.current_anchor().unwrap().is_none());
}

#[tokio::test]
async fn test_bootstrap_over_http() {
    let (port, ledger) = spawn_server().await;
    let seed = http_client(port, API_KEY);
    seed.verified_set("a", "1").await.unwrap();

    let client = http_client(port, API_KEY);
    let anchor = client.bootstrap().await.unwrap();
    assert_eq!(anchor.tx_id, 1);
    assert_eq!(anchor.tx_hash, ledger.lock().await.alh(1).unwrap());
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = http_client(port, API_KEY);
    let err = client.verified_get("k").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportFailure::Network(_))
    ));
}

#[tokio::test]
async fn test_tamper_report_over_http() {
    let (port, ledger) = spawn_server().await;
    let client = http_client(port, API_KEY);
    client.verified_set("k", "v1").await.unwrap();
    client.verified_set("k", "v2").await.unwrap();

    ledger
        .lock()
        .await
        .rewrite_tx(2, vec![ledger_trust::wire::KeyValue::new("k", "evil")])
        .unwrap();
    let err = client.verified_get("k").await.unwrap_err();
    assert!(err.is_tamper_evidence());

    client.report_tamper("k", 2).await.unwrap();
    let anchor = client.current_anchor().unwrap().unwrap();
    let guard = ledger.lock().await;
    assert_eq!(guard.tamper_reports().len(), 1);
    assert_eq!(guard.tamper_reports()[0].root, anchor.tx_hash);
    assert_eq!(guard.tamper_reports()[0].tx_id, 2);
}
