//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint against a
//! two-layer in-process tower.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use cache_tower::adapters::SharedAdapter;
use cache_tower::error::{AdapterError, AdapterResult};
use cache_tower::{
    api::create_router, AdapterKind, AppState, CacheAdapter, CacheTower, MemoryAdapter,
};
use serde_json::Value;
use tower::ServiceExt;

// == Test Adapters ==

/// Layer whose backing store is down.
struct UnreachableAdapter;

impl UnreachableAdapter {
    fn error() -> AdapterError {
        AdapterError::InvalidParams("connection refused".to_string())
    }
}

#[async_trait]
impl CacheAdapter for UnreachableAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Redis
    }

    fn namespace(&self) -> &str {
        ""
    }

    fn ttl(&self) -> Option<Duration> {
        None
    }

    async fn get(&self, _key: &str) -> AdapterResult<Option<String>> {
        Err(Self::error())
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> AdapterResult<()> {
        Err(Self::error())
    }

    async fn delete(&self, _key: &str) -> AdapterResult<()> {
        Err(Self::error())
    }

    async fn clear(&self) -> AdapterResult<()> {
        Err(Self::error())
    }

    async fn has(&self, _key: &str) -> AdapterResult<bool> {
        Err(Self::error())
    }
}

// == Helper Functions ==

fn two_layers() -> (Arc<MemoryAdapter>, Arc<MemoryAdapter>) {
    (Arc::new(MemoryAdapter::new()), Arc::new(MemoryAdapter::new()))
}

fn create_app(fast: &Arc<MemoryAdapter>, slow: &Arc<MemoryAdapter>) -> Router {
    let tower = CacheTower::with_adapters(vec![fast.clone() as SharedAdapter, slow.clone()]);
    create_router(AppState::new(tower))
}

fn create_test_app() -> Router {
    let (fast, slow) = two_layers();
    create_app(&fast, &slow)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_set(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_writes_through() {
    let (fast, slow) = two_layers();
    let app = create_app(&fast, &slow);

    let response = app
        .oneshot(put_set(r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "test_key");
    assert_eq!(json["layers"], 2);
    assert!(json["message"].as_str().unwrap().contains("test_key"));

    assert!(fast.has("test_key").await.unwrap());
    assert!(slow.has("test_key").await.unwrap());
}

#[tokio::test]
async fn test_set_endpoint_empty_key() {
    let app = create_test_app();

    let response = app
        .oneshot(put_set(r#"{"key":"","value":"value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Key cannot be empty"));
}

#[tokio::test]
async fn test_set_endpoint_malformed_body() {
    let app = create_test_app();

    let response = app.oneshot(put_set(r#"{"key":"only_key"}"#)).await.unwrap();

    assert!(response.status().is_client_error());
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set(r#"{"key":"get_key","value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get("/get/get_key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], "get_value");
    assert_eq!(json["layer"], 0);
}

#[tokio::test]
async fn test_get_endpoint_promotes_from_slow_layer() {
    let (fast, slow) = two_layers();
    slow.set("warm", "from_slow", None).await.unwrap();
    let app = create_app(&fast, &slow);

    let first = app.clone().oneshot(get("/get/warm")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["layer"], 1);
    assert_eq!(json["value"], "from_slow");

    let second = app.oneshot(get("/get/warm")).await.unwrap();
    let json = body_to_json(second.into_body()).await;
    assert_eq!(json["layer"], 0);
    assert!(fast.has("warm").await.unwrap());
}

#[tokio::test]
async fn test_get_endpoint_reports_failed_layers() {
    let slow = Arc::new(MemoryAdapter::new());
    slow.set("k", "v", None).await.unwrap();
    let tower = CacheTower::with_adapters(vec![
        Arc::new(UnreachableAdapter) as SharedAdapter,
        slow.clone(),
    ]);
    let app = create_router(AppState::new(tower));

    let response = app.oneshot(get("/get/k")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "v");
    assert_eq!(json["layer"], 1);
    assert_eq!(json["failed_layers"], serde_json::json!([0]));
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/get/nonexistent_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("nonexistent_key"));
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let (fast, slow) = two_layers();
    let app = create_app(&fast, &slow);

    let set_response = app
        .clone()
        .oneshot(put_set(r#"{"key":"delete_key","value":"delete_value"}"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let del_response = app.clone().oneshot(delete("/del/delete_key")).await.unwrap();
    assert_eq!(del_response.status(), StatusCode::OK);
    assert!(!fast.has("delete_key").await.unwrap());
    assert!(!slow.has("delete_key").await.unwrap());

    let get_response = app.oneshot(get("/get/delete_key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_absent_key_is_ok() {
    let app = create_test_app();

    let response = app.oneshot(delete("/del/nonexistent_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// == CLEAR Endpoint Tests ==

#[tokio::test]
async fn test_clear_endpoint() {
    let (fast, slow) = two_layers();
    fast.set("a", "1", None).await.unwrap();
    slow.set("b", "2", None).await.unwrap();
    let app = create_app(&fast, &slow);

    let response = app.oneshot(delete("/clear")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(fast.is_empty().await);
    assert!(slow.is_empty().await);
}

// == LAYERS / STATS / HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_layers_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/layers")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let layers = json["layers"].as_array().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0]["index"], 0);
    assert_eq!(layers[0]["adapter"], "memory");
}

#[tokio::test]
async fn test_stats_endpoint_counts_lookups() {
    let (fast, slow) = two_layers();
    slow.set("k", "v", None).await.unwrap();
    let app = create_app(&fast, &slow);

    app.clone().oneshot(get("/get/k")).await.unwrap();
    app.clone().oneshot(get("/get/missing")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["promotions"], 1);
    assert_eq!(json["layers"], 2);
    assert_eq!(json["hits_per_layer"], serde_json::json!([0, 1]));
    assert_eq!(json["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();

    let response = app.oneshot(get("/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
