//! Error handling for the API server
//!
//! Handlers return `ApiResult<Envelope<T>>`. Every error still renders as an
//! [`Envelope`] body; what varies is the transport status:
//!
//! | Error | Transport | `statusCode` |
//! |---|---|---|
//! | `Rejected` (duplicate user, bad credentials, not found, forbidden, validation) | 200 | semantic code |
//! | `Unauthorized` (missing/invalid/expired token) | 401 | 401 |
//! | `InternalError` | 500 | 500 |
//!
//! Internal error details are logged and never sent to clients.
//!
//! # Example
//!
//! ```
//! use taskvault_api::error::{ApiError, ApiResult};
//! use taskvault_api::response::Envelope;
//! use taskvault_shared::error::ServiceError;
//!
//! async fn handler() -> ApiResult<Envelope<()>> {
//!     Err(ServiceError::NotFound)?
//! }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use taskvault_shared::error::ServiceError;

use crate::response::Envelope;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Generic message for internal failures
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Expected failure, reported in-band with transport 200
    #[error("{message} ({status_code})")]
    Rejected { status_code: u16, message: String },

    /// Missing or invalid bearer token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// HTTP status of the response
    pub fn transport_status(&self) -> StatusCode {
        match self {
            ApiError::Rejected { .. } => StatusCode::OK,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope the client receives
    pub fn envelope(&self) -> Envelope<()> {
        match self {
            ApiError::Rejected {
                status_code,
                message,
            } => Envelope::failure(*status_code, message.clone()),
            ApiError::Unauthorized(message) => {
                Envelope::failure(StatusCode::UNAUTHORIZED.as_u16(), message.clone())
            }
            ApiError::InternalError(_) => Envelope::failure(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                SERVER_ERROR_MESSAGE,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            // Log internal errors but don't expose details to clients
            ApiError::InternalError(detail) => tracing::error!("Internal error: {}", detail),
            ApiError::Unauthorized(reason) => tracing::debug!(reason = %reason, "Request unauthenticated"),
            ApiError::Rejected { .. } => {}
        }

        (self.transport_status(), Json(self.envelope())).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();

        match err {
            ServiceError::DuplicateUser
            | ServiceError::InvalidCredentials
            | ServiceError::Validation(_) => ApiError::rejected(StatusCode::BAD_REQUEST, message),
            ServiceError::UserNotFound | ServiceError::NotFound => {
                ApiError::rejected(StatusCode::NOT_FOUND, message)
            }
            // Semantic 401, not 403
            ServiceError::Forbidden => ApiError::rejected(StatusCode::UNAUTHORIZED, message),
            ServiceError::Unauthenticated(reason) => ApiError::Unauthorized(reason),
            ServiceError::Internal(detail) => ApiError::InternalError(detail),
        }
    }
}

/// Malformed or incomplete JSON bodies are validation failures
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::rejected(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}
