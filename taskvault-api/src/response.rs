//! Uniform response envelope
//!
//! Every body the API returns has the same shape:
//!
//! ```json
//! { "success": true, "statusCode": 200, "message": "OK", "data": { } }
//! ```
//!
//! `statusCode` is the semantic outcome. It usually differs from the
//! transport status: expected failures travel as transport 200 with
//! `success: false`. See [`crate::error::ApiError`] for which failures
//! get a non-200 transport status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};

/// Default message for successful reads
pub const OK_MESSAGE: &str = "OK";

/// A response body, success or failure
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// Operation succeeded; `data` is `None` for operations with no result
    Success { message: String, data: Option<T> },

    /// Operation failed with a semantic status code
    Failure { status_code: u16, message: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Wire<'a, T> {
    success: bool,
    status_code: u16,
    message: &'a str,
    data: Option<&'a T>,
}

impl<T> Envelope<T> {
    /// Success with the default `OK` message
    pub fn ok(data: T) -> Self {
        Self::with_message(data, OK_MESSAGE)
    }

    /// Success with a custom message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Envelope::Success {
            message: message.into(),
            data: Some(data),
        }
    }

    /// Success with `data: null`
    pub fn empty(message: impl Into<String>) -> Self {
        Envelope::Success {
            message: message.into(),
            data: None,
        }
    }

    /// Failure with a semantic status code
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Envelope::Failure {
            status_code,
            message: message.into(),
        }
    }

    /// Value of the `success` field
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// Value of the `statusCode` field
    pub fn status_code(&self) -> u16 {
        match self {
            Envelope::Success { .. } => StatusCode::OK.as_u16(),
            Envelope::Failure { status_code, .. } => *status_code,
        }
    }

    /// Value of the `message` field
    pub fn message(&self) -> &str {
        match self {
            Envelope::Success { message, .. } | Envelope::Failure { message, .. } => message,
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = match self {
            Envelope::Success { data, .. } => data.as_ref(),
            Envelope::Failure { .. } => None,
        };

        Wire {
            success: self.is_success(),
            status_code: self.status_code(),
            message: self.message(),
            data,
        }
        .serialize(serializer)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
