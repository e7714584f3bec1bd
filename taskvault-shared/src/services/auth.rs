//! Registration and login
//!
//! # Flow
//!
//! ```text
//! register: lookup username -> hash password -> insert user -> issue token
//! login:    lookup username -> verify password -> issue token
//! ```
//!
//! Argon2 is deliberately slow, so hashing and verification run on tokio's
//! blocking pool rather than on an executor thread.

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use validator::Validate;

use crate::auth::jwt::TokenIssuer;
use crate::auth::middleware::{bearer_token, AuthContext};
use crate::auth::password::{hash_password_with, verify_password, PasswordConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, Role};
use crate::store::UserStore;

/// Username and password as submitted by clients
///
/// The length rules apply to registration only.
#[derive(Clone, Deserialize, Validate)]
pub struct Credentials {
    /// Account name (case-sensitive)
    #[validate(length(min = 1, max = 64, message = "Username must be 1 to 64 characters"))]
    pub username: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Credentials {
    /// Convenience constructor
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returned by a successful register or login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Signed bearer token
    pub token: String,

    /// Role of the account
    pub role: Role,

    /// Token lifetime, e.g. `"1h"`
    pub expiration_time: String,
}

/// Renders a duration compactly: `1h`, `30m`, `1h30m`, `45s`
pub fn format_ttl(ttl: Duration) -> String {
    let total = ttl.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{}s", seconds));
    }
    out
}

/// Registration, login and token verification
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    issuer: TokenIssuer,
    password: PasswordConfig,
}

impl AuthService {
    /// Creates the service
    pub fn new(users: Arc<dyn UserStore>, issuer: TokenIssuer, password: PasswordConfig) -> Self {
        Self {
            users,
            issuer,
            password,
        }
    }

    /// Registers a new account with role `USER`
    ///
    /// # Errors
    ///
    /// - `Validation` if username or password is empty
    /// - `DuplicateUser` if the username is taken, including when a
    ///   concurrent registration wins the race at insert time
    pub async fn register(&self, credentials: Credentials) -> ServiceResult<AuthPayload> {
        credentials.validate()?;
        let Credentials { username, password } = credentials;

        if self.users.find_by_username(&username).await?.is_some() {
            debug!(username = %username, "Registration rejected: username taken");
            return Err(ServiceError::DuplicateUser);
        }

        let config = self.password;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_with(&password, &config))
                .await
                .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))??;

        let user = self
            .users
            .insert(CreateUser {
                username,
                password_hash,
                role: Role::User,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        self.payload_for(user.id, user.role)
    }

    /// Checks credentials and issues a fresh token
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no account has this username
    /// - `InvalidCredentials` if the password does not match
    ///
    /// Registration rules are not applied here; only lookup and password
    /// verification decide the outcome.
    pub async fn login(&self, credentials: Credentials) -> ServiceResult<AuthPayload> {
        let Credentials { username, password } = credentials;

        let user = match self.users.find_by_username(&username).await? {
            Some(user) => user,
            None => {
                debug!(username = %username, "Login rejected: unknown user");
                return Err(ServiceError::UserNotFound);
            }
        };

        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| ServiceError::Internal(format!("Verification task failed: {}", e)))??;

        if !matches {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");

        self.payload_for(user.id, user.role)
    }

    /// Resolves the request's `Authorization` header to the caller's identity
    ///
    /// # Errors
    ///
    /// `Unauthenticated` if the header is missing or not a Bearer credential,
    /// or the token fails verification
    pub fn authenticate(&self, headers: &HeaderMap) -> ServiceResult<AuthContext> {
        let token = bearer_token(headers)?;
        self.verify_token(token)
    }

    /// Resolves a raw bearer token to the caller's identity
    ///
    /// # Errors
    ///
    /// `Unauthenticated` if the token is malformed, forged or expired
    pub fn verify_token(&self, token: &str) -> ServiceResult<AuthContext> {
        let claims = self.issuer.verify(token)?;
        Ok(claims.into())
    }

    fn payload_for(&self, user_id: uuid::Uuid, role: Role) -> ServiceResult<AuthPayload> {
        let issued = self.issuer.issue(user_id, role)?;

        Ok(AuthPayload {
            token: issued.token,
            role,
            expiration_time: format_ttl(issued.ttl),
        })
    }
}
