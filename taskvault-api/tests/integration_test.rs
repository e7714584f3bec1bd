//! Integration tests for the TaskVault API
//!
//! These drive the real router in-process:
//! - Registration and login envelopes
//! - The bearer token gate
//! - Task CRUD, ordering and the status filter
//! - Ownership enforcement across users

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{assert_rejected, TestContext};
use serde_json::{json, Value};

async fn login(ctx: &TestContext, username: &str, password: &str) -> (StatusCode, Value) {
    ctx.send(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["store"], "connected");
}

#[tokio::test]
async fn test_register_envelope() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "pw1" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["role"], "USER");
    assert_eq!(body["data"]["expirationTime"], "1h");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_duplicate_is_in_band() {
    let ctx = TestContext::new();
    ctx.register("alice", "pw1").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "alice", "password": "other" })),
        )
        .await;

    assert_rejected(status, &body, 400, "User already exists");
}

#[tokio::test]
async fn test_login_outcomes() {
    let ctx = TestContext::new();
    ctx.register("alice", "pw1").await;

    let (status, body) = login(&ctx, "alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["expirationTime"], "1h");

    let (status, body) = login(&ctx, "alice", "wrong").await;
    assert_rejected(status, &body, 400, "Invalid credentials");

    let (status, body) = login(&ctx, "bob", "pw1").await;
    assert_rejected(status, &body, 404, "User not found");
}

#[tokio::test]
async fn test_login_skips_registration_rules() {
    let ctx = TestContext::new();
    ctx.register("alice", "pw1").await;

    let (status, body) = login(&ctx, &"a".repeat(65), "pw1").await;
    assert_rejected(status, &body, 404, "User not found");

    let (status, body) = login(&ctx, "alice", "").await;
    assert_rejected(status, &body, 400, "Invalid credentials");
}

#[tokio::test]
async fn test_malformed_auth_body_is_validation_error() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(Method::POST, "/api/auth/register", None, Some(json!({ "username": "alice" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_task_routes_require_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/api/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Missing authorization header");

    let (status, body) = ctx.send(Method::GET, "/api/tasks", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let request = Request::builder()
        .uri("/api/tasks/status?completed=true")
        .header(header::AUTHORIZATION, "Basic YWxpY2U6cHcx")
        .body(Body::empty())
        .unwrap();
    let (status, _) = ctx.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let ctx = TestContext::with_env(&[("JWT_TTL_SECONDS", "1")]);
    let token = ctx.register("alice", "pw1").await;

    let (status, _) = ctx.send(Method::GET, "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(2100)).await;

    let (status, body) = ctx.send(Method::GET, "/api/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_create_task_defaults() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": "Buy milk", "subject": "errands", "dueDate": "2025-01-04" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task created successfully");
    let task = &body["data"];
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["completed"], false);
    assert_eq!(task["subject"], "errands");
    assert_eq!(task["dueDate"], "2025-01-04T00:00:00Z");
    assert!(task["description"].is_null());
    assert!(task["id"].is_string());
    assert!(task["user"].is_string());
}

#[tokio::test]
async fn test_create_task_validation() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;

    let (status, body) = ctx
        .send(Method::POST, "/api/tasks", Some(&token), Some(json!({ "subject": "x" })))
        .await;
    assert_rejected(status, &body, 400, "Title is required");

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": "ok", "description": "a".repeat(501) })),
        )
        .await;
    assert_rejected(status, &body, 400, "Description must be at most 500 characters");

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/tasks",
            Some(&token),
            Some(json!({ "title": "ok", "dueDate": "someday" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_list_newest_first_and_status_route() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;

    ctx.create_task(&token, json!({ "title": "first", "completed": true })).await;
    ctx.create_task(&token, json!({ "title": "second" })).await;
    ctx.create_task(&token, json!({ "title": "third" })).await;

    let (_, body) = ctx.send(Method::GET, "/api/tasks", Some(&token), None).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    // Must hit the status route, not /tasks/:id with id "status"
    let (status, body) = ctx
        .send(Method::GET, "/api/tasks/status?completed=true", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "first");

    let (_, body) = ctx
        .send(Method::GET, "/api/tasks/status?completed=false", Some(&token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Anything but the literal "true" means open tasks
    let (_, body) = ctx
        .send(Method::GET, "/api/tasks/status?completed=yes", Some(&token), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_partial_update() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;
    let task = ctx
        .create_task(&token, json!({ "title": "X", "description": "keep me" }))
        .await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let (status, body) = ctx
        .send(Method::PUT, &uri, Some(&token), Some(json!({ "completed": true })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task updated successfully");
    let updated = &body["data"];
    assert_eq!(updated["title"], "X");
    assert_eq!(updated["description"], "keep me");
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["createdAt"], task["createdAt"]);
    assert_ne!(updated["updatedAt"], task["updatedAt"]);
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice", "pw1").await;
    let bob = ctx.register("bob", "pw2").await;
    let task = ctx.create_task(&alice, json!({ "title": "X" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = ctx.send(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Task removed");
    assert!(body["data"].is_null());

    for token in [&alice, &bob] {
        let (status, body) = ctx.send(Method::GET, &uri, Some(token), None).await;
        assert_rejected(status, &body, 404, "Task not found");
    }
}

#[tokio::test]
async fn test_invalid_task_id_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;

    let (status, body) = ctx.send(Method::GET, "/api/tasks/not-a-uuid", Some(&token), None).await;
    assert_rejected(status, &body, 404, "Task not found");

    let (status, body) = ctx
        .send(Method::PUT, "/api/tasks/42", Some(&token), Some(json!({ "title": "Y" })))
        .await;
    assert_rejected(status, &body, 404, "Task not found");
}

#[tokio::test]
async fn test_cross_user_access_is_forbidden() {
    let ctx = TestContext::new();
    let alice = ctx.register("alice", "pw1").await;
    let bob = ctx.register("bob", "pw2").await;
    let task = ctx.create_task(&alice, json!({ "title": "secret" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = ctx.send(Method::GET, &uri, Some(&bob), None).await;
    assert_rejected(status, &body, 401, "Not authorized");

    let (status, body) = ctx
        .send(Method::PUT, &uri, Some(&bob), Some(json!({ "title": "mine" })))
        .await;
    assert_rejected(status, &body, 401, "Not authorized");

    let (status, body) = ctx.send(Method::DELETE, &uri, Some(&bob), None).await;
    assert_rejected(status, &body, 401, "Not authorized");

    let (_, body) = ctx.send(Method::GET, "/api/tasks", Some(&bob), None).await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = ctx.send(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(body["data"]["title"], "secret");
}

#[tokio::test]
async fn test_ownership_is_per_user_not_per_token() {
    let ctx = TestContext::new();

    let token_a = ctx.register("alice", "pw1").await;
    let task = ctx.create_task(&token_a, json!({ "title": "Buy milk" })).await;
    assert_eq!(task["completed"], false);

    let (status, body) = login(&ctx, "alice", "pw1").await;
    assert_eq!(status, StatusCode::OK);
    let token_a2 = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(token_a, token_a2);

    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());
    let (status, body) = ctx.send(Method::GET, &uri, Some(&token_a2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], task);
}

#[tokio::test]
async fn test_unknown_route() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::GET, "/api/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unsupported_method_gets_envelope() {
    let ctx = TestContext::new();
    let token = ctx.register("alice", "pw1").await;
    let task = ctx.create_task(&token, json!({ "title": "X" })).await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = ctx.send(Method::PATCH, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 405);
    assert_eq!(body["message"], "Method not allowed");

    let (status, body) = ctx.send(Method::DELETE, "/api/auth/login", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["statusCode"], 405);
}
