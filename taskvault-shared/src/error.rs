//! Service error taxonomy
//!
//! Every failure the services can report maps to one variant here. The API
//! layer decides how each variant is rendered; nothing in this crate knows
//! about HTTP status codes.

use validator::ValidationErrors;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by the auth and task services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Username is already registered
    #[error("User already exists")]
    DuplicateUser,

    /// No account with that username
    #[error("User not found")]
    UserNotFound,

    /// Password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid or expired token
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but the resource belongs to someone else
    #[error("Not authorized")]
    Forbidden,

    /// No task with that id
    #[error("Task not found")]
    NotFound,

    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Store or other unexpected failure; detail is for logs only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => ServiceError::DuplicateUser,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            JwtError::Expired => ServiceError::Unauthenticated("Token expired".to_string()),
            _ => ServiceError::Unauthenticated("Invalid token".to_string()),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(describe_validation(&errors))
    }
}

/// Flattens validator output into one message, fields in name order
pub fn describe_validation(errors: &ValidationErrors) -> String {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
        })
        .collect();

    messages.sort();
    messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}
