//! Authentication endpoints
//!
//! # Endpoints
//!
//! - `POST /api/auth/register` - Register a new user
//! - `POST /api/auth/login` - Login and get a token
//!
//! Both return the same payload:
//!
//! ```json
//! {
//!   "success": true,
//!   "statusCode": 200,
//!   "message": "Login successful",
//!   "data": { "token": "eyJ...", "role": "USER", "expirationTime": "1h" }
//! }
//! ```

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use taskvault_shared::services::auth::{AuthPayload, Credentials};

use crate::{app::AppState, error::ApiResult, response::Envelope};

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1" }
/// ```
///
/// # Errors (in the envelope)
///
/// - `400 User already exists`
/// - `400` validation message for an empty or missing field
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Envelope<AuthPayload>> {
    let Json(credentials) = body?;

    let payload = state.auth.register(credentials).await?;

    Ok(Envelope::with_message(payload, "User registered successfully"))
}

/// Login with username and password
///
/// # Errors (in the envelope)
///
/// - `404 User not found`
/// - `400 Invalid credentials`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Envelope<AuthPayload>> {
    let Json(credentials) = body?;

    let payload = state.auth.login(credentials).await?;

    Ok(Envelope::with_message(payload, "Login successful"))
}
