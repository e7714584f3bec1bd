//! Bearer token gate
//!
//! Every `/api/tasks` route sits behind [`jwt_auth_layer`]. A request without
//! a valid token never reaches a handler: it is answered with transport 401
//! and an envelope carrying the reason.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::ApiError};

/// Verifies the bearer token and injects the caller's `AuthContext`
///
/// Handlers read it with `Extension<AuthContext>`.
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = state.auth.authenticate(req.headers())?;

    tracing::debug!(user_id = %auth.user_id, "Request authenticated");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
