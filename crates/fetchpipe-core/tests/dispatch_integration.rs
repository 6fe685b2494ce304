//! End-to-end dispatch tests against a live HTTP fixture
//!
//! Spins up an axum server on an ephemeral port and drives the full
//! pipeline through it: success, empty responses, error statuses, decode
//! fallbacks, and network-level failures.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use fetchpipe_core::{Client, FetchStatus, Payload, RequestConfig, ResponseType};

async fn test_endpoint() -> Json<Value> {
    Json(json!({
        "code": 0,
        "msg": "success",
        "data": {
            "id": 1,
            "name": "张三",
            "age": 20,
            "sex": "男",
            "address": "北京市海淀区",
            "phone": "13800138000",
        }
    }))
}

async fn echo_endpoint(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "id": id }))
}

/// Serve the fixture router on an ephemeral port and return its base URL
async fn spawn_fixture() -> String {
    let router = Router::new()
        .route("/test", post(test_endpoint))
        .route("/echo/:id", get(echo_endpoint))
        .route("/plain", get(|| async { "not json" }))
        .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
        .route(
            "/boom",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broken") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Grab a port with nothing listening on it
async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_dispatch_returns_parsed_json_on_success() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .post(format!("{}/test", base), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Ok);
    assert!(envelope.error.is_none());

    let response = envelope.response.as_ref().unwrap();
    assert_eq!(response.status.as_u16(), 200);

    match envelope.data {
        Some(Payload::Json(value)) => {
            assert_eq!(value["code"], 0);
            assert_eq!(value["msg"], "success");
            assert_eq!(value["data"]["name"], "张三");
        }
        other => panic!("expected JSON payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_content_response_skips_decoding() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(format!("{}/empty", base), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Ok);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.response.unwrap().status.as_u16(), 204);
}

#[tokio::test]
async fn test_client_error_status_maps_to_error_envelope() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(format!("{}/missing", base), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Error);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.error.unwrap().to_string(), "Not Found");
    assert_eq!(envelope.response.unwrap().status.as_u16(), 404);
}

#[tokio::test]
async fn test_server_error_status_maps_to_error_envelope() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(format!("{}/boom", base), RequestConfig::default())
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Error);
    assert_eq!(envelope.error.unwrap().to_string(), "Internal Server Error");
    assert_eq!(envelope.response.unwrap().status.as_u16(), 500);
}

#[tokio::test]
async fn test_connection_failure_maps_to_error_envelope_without_response() {
    let port = unused_port().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(
            format!("http://127.0.0.1:{}/anything", port),
            RequestConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Error);
    assert!(envelope.data.is_none());
    assert!(envelope.response.is_none());
    assert!(envelope.error.is_some());
}

#[tokio::test]
async fn test_json_decode_failure_is_reported_ok_with_null_data() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(
            format!("{}/plain", base),
            RequestConfig::default().with_response_type(ResponseType::Json),
        )
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Ok);
    assert!(envelope.data.is_none());
    assert!(envelope.error.is_none());
    assert!(envelope.response.is_some());
}

#[tokio::test]
async fn test_text_response_type_decodes_the_raw_body() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(
            format!("{}/plain", base),
            RequestConfig::default().with_response_type(ResponseType::Text),
        )
        .await
        .unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Ok);
    assert_eq!(envelope.data, Some(Payload::Text("not json".to_string())));
}

#[tokio::test]
async fn test_binary_response_types_hand_back_the_bytes() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let envelope = client
        .get(
            format!("{}/plain", base),
            RequestConfig::default().with_response_type(ResponseType::ArrayBuffer),
        )
        .await
        .unwrap();

    assert_eq!(
        envelope.data,
        Some(Payload::ArrayBuffer(b"not json".to_vec()))
    );
}

#[tokio::test]
async fn test_derived_client_resolves_relative_urls_against_its_host() {
    let base = spawn_fixture().await;
    let root = Client::new(RequestConfig::default());

    let scoped = root.create(RequestConfig::default().with_host(base));
    let envelope = scoped.post("/test", RequestConfig::default()).await.unwrap();

    assert_eq!(envelope.fetch_status, FetchStatus::Ok);
    match envelope.data {
        Some(Payload::Json(value)) => assert_eq!(value["msg"], "success"),
        other => panic!("expected JSON payload, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_calls_keep_their_own_responses() {
    let base = spawn_fixture().await;
    let client = Client::new(RequestConfig::default());

    let (left, right) = tokio::join!(
        client.get(format!("{}/echo/left", base), RequestConfig::default()),
        client.get(format!("{}/echo/right", base), RequestConfig::default()),
    );

    let left = left.unwrap();
    let right = right.unwrap();

    assert_eq!(left.data, Some(Payload::Json(json!({ "id": "left" }))));
    assert_eq!(right.data, Some(Payload::Json(json!({ "id": "right" }))));
    assert!(left.response.unwrap().url.ends_with("/echo/left"));
    assert!(right.response.unwrap().url.ends_with("/echo/right"));
}
