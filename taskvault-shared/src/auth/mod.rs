//! Authentication utilities
//!
//! This module provides the authentication primitives for TaskVault:
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing with a tunable work factor
//! - [`jwt`]: Signed, time-bounded bearer tokens
//! - [`middleware`]: Bearer header parsing into an [`middleware::AuthContext`]
//!
//! # Security Features
//!
//! - **Password Hashing**: Argon2id, random salt embedded in the PHC string
//! - **JWT Tokens**: HS256 signing, zero-leeway expiry, issuer check
//! - **Stateless**: Tokens are never stored; validity is signature + expiry
//!
//! # Example
//!
//! ```
//! use taskvault_shared::auth::jwt::{JwtConfig, TokenIssuer};
//! use taskvault_shared::auth::password::{hash_password_with, verify_password, PasswordConfig};
//! use taskvault_shared::models::user::Role;
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password_with("hunter2", &PasswordConfig::light())?;
//! assert!(verify_password("hunter2", &hash)?);
//!
//! let issuer = TokenIssuer::new(&JwtConfig::new("an-example-secret-of-at-least-32-bytes"));
//! let issued = issuer.issue(Uuid::new_v4(), Role::User)?;
//! let claims = issuer.verify(&issued.token)?;
//! assert_eq!(claims.role, Role::User);
//! # Ok(())
//! # }
//! ```

pub mod jwt;
pub mod middleware;
pub mod password;
