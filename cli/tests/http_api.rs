//! Router tests with a real sqlite store and shell workers.
#![cfg(unix)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use pretty_assertions::assert_eq;
use tokio::sync::broadcast;
use tower::ServiceExt;
use weaver_cli::http::routes::create_router;
use weaver_cli::http::state::AppState;
use weaver_core::api::{AppConfig, ChunkStore, Invoker, NewChunk, SqliteChunkStore, WorkerConfig};

fn worker_cfg(program: &str, args: &[&str]) -> WorkerConfig {
    WorkerConfig {
        program: program.to_string(),
        args: args.iter().map(|s| s.to_string()).collect(),
        env: HashMap::new(),
        timeout_ms: 5_000,
        kill_grace_ms: 1_000,
        capture_bytes: 1_048_576,
        max_concurrent: 0,
    }
}

fn echo_worker() -> WorkerConfig {
    worker_cfg("/bin/echo", &[])
}

fn state_with(worker: WorkerConfig) -> AppState {
    let cfg = AppConfig {
        worker: worker.clone(),
        ..AppConfig::default()
    };
    let invoker = Arc::new(Invoker::new(worker));
    let store: Arc<dyn ChunkStore> = Arc::new(SqliteChunkStore::in_memory().unwrap());
    let (shutdown_tx, _) = broadcast::channel(1);
    AppState::new("test-session".into(), invoker, store, cfg, shutdown_tx)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn concat_returns_joined_output() {
    let app = create_router(state_with(echo_worker()));

    let response = app
        .oneshot(post_json(
            "/api/v1/concat",
            r#"{"field_a":"hello","field_b":"world"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], "hello world");
}

#[tokio::test]
async fn concat_accepts_legacy_field_names() {
    let app = create_router(state_with(echo_worker()));

    let response = app
        .oneshot(post_json(
            "/api/v1/concat",
            r#"{"string1":"hello","string2":"world"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], "hello world");
}

#[tokio::test]
async fn concat_missing_field_defaults_to_empty() {
    let app = create_router(state_with(echo_worker()));

    let response = app
        .oneshot(post_json("/api/v1/concat", r#"{"field_a":"solo"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"], "solo");
}

#[tokio::test]
async fn concat_malformed_body_is_generic_500() {
    let app = create_router(state_with(echo_worker()));

    let response = app
        .oneshot(post_json("/api/v1/concat", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn concat_worker_stderr_is_500_with_message() {
    let app = create_router(state_with(worker_cfg(
        "/bin/sh",
        &["-c", "echo boom >&2", "worker"],
    )));

    let response = app
        .oneshot(post_json("/api/v1/concat", r#"{"field_a":"a","field_b":"b"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "boom\n");
}

#[tokio::test]
async fn chunks_listing_is_newest_first() {
    let state = state_with(echo_worker());
    state
        .store
        .insert(NewChunk {
            timestamp: "00:00:01".into(),
            filename: "a.txt".into(),
            speaker: "narrator".into(),
            content: "first".into(),
        })
        .await
        .unwrap();
    state
        .store
        .insert(NewChunk {
            timestamp: "00:00:02".into(),
            filename: "b.txt".into(),
            speaker: "narrator".into(),
            content: "second".into(),
        })
        .await
        .unwrap();

    let app = create_router(state);
    let response = app.oneshot(get("/api/v1/chunks")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["content"], "second");
    assert_eq!(data[1]["content"], "first");
}

#[tokio::test]
async fn health_reports_session() {
    let app = create_router(state_with(echo_worker()));

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["session_id"], "test-session");
}

#[tokio::test]
async fn shutdown_endpoint_signals_server() {
    let state = state_with(echo_worker());
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    let app = create_router(state);
    let response = app
        .oneshot(post_json("/api/v1/shutdown", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(shutdown_rx.try_recv().is_ok());
}
