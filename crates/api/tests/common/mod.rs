#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use warden_api::config::{LogFormat, ServerConfig, StoreBackend};
use warden_api::router::{build_app_router, App};
use warden_api::state::AppState;
use warden_db::{MemoryStore, RbacStore};

/// Build a test `ServerConfig` with safe defaults and the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        log_format: LogFormat::Pretty,
    }
}

/// One application instance. Every call to [`TestApp::app`] builds a fresh
/// router over the same store, so state carries across requests.
#[derive(Clone)]
pub struct TestApp {
    state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn RbacStore>) -> Self {
        Self {
            state: AppState {
                store,
                config: Arc::new(test_config()),
            },
        }
    }

    /// Build the full application router with all middleware layers.
    pub fn app(&self) -> App {
        build_app_router(self.state.clone(), &self.state.config)
    }
}

pub async fn send(app: App, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: App, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: App, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(app: App, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: App, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PATCH, uri, body).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a permission and return its id.
pub async fn create_permission(ctx: &TestApp, code: &str, name: &str) -> i64 {
    let response = post_json(
        ctx.app(),
        "/api/v1/permissions",
        serde_json::json!({"code": code, "name": name}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a role and return its id.
pub async fn create_role(ctx: &TestApp, name: &str) -> i64 {
    let response = post_json(
        ctx.app(),
        "/api/v1/roles",
        serde_json::json!({"name": name}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a person and return their id.
pub async fn create_person(ctx: &TestApp, name: &str, email: &str) -> i64 {
    let response = post_json(
        ctx.app(),
        "/api/v1/users",
        serde_json::json!({"name": name, "email": email, "password": "s3cret-pass"}),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}
