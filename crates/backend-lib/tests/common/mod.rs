//! Test utilities for the authgate server tests
//!
//! Builds a router over a fresh store with a fast hashing cost and a fixed
//! secret, and wraps the request/response plumbing the flow tests need.
#![allow(dead_code)]

use std::sync::Arc;

use authgate_backend::{config::Settings, router::create_router, storage::MemoryStore, AppState};
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

/// Settings suitable for tests: cheap scrypt cost and a known secret
pub fn test_settings() -> Settings {
    Settings {
        token_secret: Some(TEST_SECRET.to_string()),
        password_cost: 10,
        ..Settings::default()
    }
}

/// Sets up a router over an empty in-memory store
///
/// The store handle is returned so tests can inspect records directly.
pub fn setup_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(Arc::new(store.clone()), test_settings())
        .expect("Failed to create AppState for test");
    (create_router(Arc::new(state)), store)
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestResponse {
    /// The `name=value` pair of the Set-Cookie header, if any
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie
            .as_ref()
            .and_then(|c| c.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    /// Value of the session cookie set by this response
    pub fn token(&self) -> Option<String> {
        self.cookie_pair()
            .and_then(|pair| pair.strip_prefix("token=").map(str::to_string))
    }
}

async fn decode(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        set_cookie,
        body,
    }
}

/// POST a JSON body
pub async fn post_json(app: &Router, uri: &str, body: Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    decode(app.clone().oneshot(request).await.unwrap()).await
}

/// POST with no body at all
pub async fn post_empty(app: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).unwrap();
    decode(app.clone().oneshot(request).await.unwrap()).await
}

/// GET /api/me, optionally carrying a session token
pub async fn get_me(app: &Router, token: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().uri("/api/me");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("token={token}"));
    }
    let request = builder.body(Body::empty()).unwrap();
    decode(app.clone().oneshot(request).await.unwrap()).await
}
