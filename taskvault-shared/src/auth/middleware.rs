//! Bearer token extraction
//!
//! Pulls the raw token out of an `Authorization: Bearer <token>` header and
//! defines the [`AuthContext`] the API layer attaches to each request.
//! Verification itself belongs to
//! [`AuthService`](crate::services::auth::AuthService).
//!
//! # Example
//!
//! ```
//! use axum::http::{header, HeaderMap, HeaderValue};
//! use taskvault_shared::auth::middleware::bearer_token;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
//!
//! assert_eq!(bearer_token(&headers)?, "abc.def.ghi");
//! # Ok(())
//! # }
//! ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::error::ServiceError;
use crate::models::user::Role;

/// Identity resolved from a verified token
///
/// Inserted into request extensions by the auth layer; handlers take it
/// with `Extension<AuthContext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried in the token
    pub role: Role,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Error type for bearer token extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid token")]
    InvalidFormat,
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        ServiceError::Unauthenticated(err.to_string())
    }
}

/// Returns the raw token from the Authorization header
///
/// The scheme is matched case-insensitively; the token must be non-empty.
///
/// # Errors
///
/// - `MissingCredentials` if there is no Authorization header
/// - `InvalidFormat` if it is not a non-empty Bearer credential
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidFormat)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat);
    }

    Ok(token)
}
