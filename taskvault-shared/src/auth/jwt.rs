//! JWT token issuance and verification
//!
//! Tokens are signed with HS256 and carry the user's identity and role.
//! They are never stored server-side: a token is valid exactly when its
//! signature checks out, its issuer is `taskvault` and its expiry has not
//! passed. There is no revocation before expiry.
//!
//! The signing secret is handed to [`TokenIssuer::new`] once at startup and
//! is read-only afterwards.
//!
//! # Example
//!
//! ```
//! use taskvault_shared::auth::jwt::{JwtConfig, TokenIssuer};
//! use taskvault_shared::models::user::Role;
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let issuer = TokenIssuer::new(&JwtConfig::new("your-secret-key-at-least-32-bytes"));
//! let user_id = Uuid::new_v4();
//!
//! let issued = issuer.issue(user_id, Role::User)?;
//! let claims = issuer.verify(&issued.token)?;
//! assert_eq!(claims.sub, user_id);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer claim stamped on (and required of) every token
pub const ISSUER: &str = "taskvault";

/// Default token lifetime in seconds (1 hour)
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer claim did not match
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HMAC secret
    ///
    /// Should be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in seconds
    pub ttl_seconds: i64,
}

impl JwtConfig {
    /// Creates a config with the default one-hour lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Overrides the token lifetime
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Token lifetime as a duration
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_seconds)
    }
}

// Keep the secret out of logs
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// JWT claims
///
/// # Standard Claims
///
/// - `sub`: User ID
/// - `iss`: Always "taskvault"
/// - `iat` / `nbf`: Issue time
/// - `exp`: Expiration time
/// - `jti`: Random token ID, makes every issued token distinct
///
/// # Custom Claims
///
/// - `role`: The user's role at issue time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Role of the user when the token was issued
    pub role: Role,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token ID
    pub jti: Uuid,
}

impl Claims {
    /// Builds claims expiring `ttl` from now
    pub fn new(user_id: Uuid, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiration as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Lifetime the token was issued with
    pub ttl: Duration,
}

/// Signs and verifies bearer tokens with a process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer from configuration
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: config.ttl(),
        }
    }

    /// Default lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token with the configured lifetime
    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<IssuedToken, JwtError> {
        self.issue_with_ttl(user_id, role, self.ttl)
    }

    /// Issues a token with an explicit lifetime
    ///
    /// A negative `ttl` yields an already-expired token, which is only
    /// useful in tests.
    pub fn issue_with_ttl(
        &self,
        user_id: Uuid,
        role: Role,
        ttl: Duration,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(user_id, role, ttl);
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::CreateError("Expiration out of range".to_string()))?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at,
            ttl,
        })
    }

    /// Verifies a token and returns its claims
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` once `exp` has passed
    /// - `JwtError::InvalidIssuer` if the token was not issued by TaskVault
    /// - `JwtError::ValidationError` for bad signatures and malformed tokens
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            })?;

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig::new(SECRET))
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let issued = issuer().issue(user_id, Role::User).expect("Should issue token");

        let claims = issuer().verify(&issued.token).expect("Should verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        let issued = issuer().issue(Uuid::new_v4(), Role::User).unwrap();
        assert_eq!(issued.ttl, Duration::hours(1));

        let remaining = (issued.expires_at - Utc::now()).num_seconds();
        assert!(remaining > 3500 && remaining <= 3600);
    }

    #[test]
    fn test_tokens_for_same_user_differ() {
        let user_id = Uuid::new_v4();
        let first = issuer().issue(user_id, Role::User).unwrap();
        let second = issuer().issue(user_id, Role::User).unwrap();

        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issued = issuer().issue(Uuid::new_v4(), Role::User).unwrap();
        let other = TokenIssuer::new(&JwtConfig::new("a-completely-different-secret-value!!"));

        assert!(matches!(other.verify(&issued.token), Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let issued = issuer()
            .issue_with_ttl(Uuid::new_v4(), Role::User, Duration::seconds(-3600))
            .unwrap();

        assert!(matches!(issuer().verify(&issued.token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_accepted_until_expiry_then_rejected() {
        let issued = issuer()
            .issue_with_ttl(Uuid::new_v4(), Role::User, Duration::seconds(1))
            .unwrap();
        assert!(issuer().verify(&issued.token).is_ok());

        std::thread::sleep(std::time::Duration::from_millis(2100));
        assert!(matches!(issuer().verify(&issued.token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_malformed_token() {
        assert!(issuer().verify("not-a-jwt").is_err());
        assert!(issuer().verify("").is_err());
    }

    #[test]
    fn test_verify_tampered_token() {
        let issued = issuer().issue(Uuid::new_v4(), Role::User).unwrap();
        let admin = issuer().issue(Uuid::new_v4(), Role::Admin).unwrap();

        // Splice the admin payload onto the user signature
        let user_parts: Vec<&str> = issued.token.split('.').collect();
        let admin_parts: Vec<&str> = admin.token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert!(issuer().verify(&forged).is_err());
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), Role::User, Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(issuer().verify(&token), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::new(SECRET));
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("redacted"));
    }
}
