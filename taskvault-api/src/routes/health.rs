//! Health check endpoint
//!
//! # Endpoint
//!
//! ```text
//! GET /health
//! ```
//!
//! # Response
//!
//! ```json
//! {
//!   "success": true,
//!   "statusCode": 200,
//!   "message": "OK",
//!   "data": { "status": "healthy", "version": "0.1.0", "store": "connected" }
//! }
//! ```

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::{app::AppState, response::Envelope};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// Store reachability: `connected` or `disconnected`
    pub store: String,
}

/// Health check handler
///
/// Always answers; a store outage shows up as `degraded` rather than an
/// error.
pub async fn health_check(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let connected = match state.storage.users.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check: store unreachable: {}", e);
            false
        }
    };

    Envelope::ok(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}
