//! Common test utilities for integration tests
//!
//! Every test gets its own router over fresh in-memory stores, so tests
//! need no external services and never see each other's data.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use taskvault_api::app::{build_router, AppState};
use taskvault_api::config::Config;
use taskvault_shared::auth::password::PasswordConfig;
use taskvault_shared::store::Storage;
use tower::ServiceExt as _;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router under test
pub struct TestContext {
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Fresh app with default settings and cheap password hashing
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Fresh app with extra configuration variables
    pub fn with_env(pairs: &[(&str, &str)]) -> Self {
        let mut config = Config::from_lookup(|key| {
            if key == "JWT_SECRET" {
                return Some(TEST_SECRET.to_string());
            }
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
        .expect("test config");
        config.password = PasswordConfig::light();

        let app = build_router(AppState::new(Storage::in_memory(), config.clone()));

        Self { app, config }
    }

    /// Sends a request and returns the transport status and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    /// Registers a user and returns the token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["success"], true, "{}", body);

        body["data"]["token"].as_str().expect("token").to_string()
    }

    /// Creates a task and returns its JSON
    pub async fn create_task(&self, token: &str, fields: Value) -> Value {
        let (status, body) = self.send(Method::POST, "/api/tasks", Some(token), Some(fields)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["success"], true, "{}", body);

        body["data"].clone()
    }
}

/// Asserts an in-band failure: transport 200 with the given semantic code
pub fn assert_rejected(status: StatusCode, body: &Value, code: u16, message: &str) {
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], false, "{}", body);
    assert_eq!(body["statusCode"], code, "{}", body);
    assert_eq!(body["message"], message, "{}", body);
    assert!(body["data"].is_null(), "{}", body);
}
