//! Shared helpers for integration tests

#![allow(dead_code)]

use taskvault_shared::auth::jwt::{JwtConfig, TokenIssuer};
use taskvault_shared::auth::password::PasswordConfig;
use taskvault_shared::models::task::TaskFields;
use taskvault_shared::services::auth::AuthService;
use taskvault_shared::services::tasks::TaskService;
use taskvault_shared::store::Storage;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Services wired to fresh in-memory stores
pub struct TestServices {
    pub auth: AuthService,
    pub tasks: TaskService,
    pub issuer: TokenIssuer,
}

pub fn services() -> TestServices {
    services_with_ttl(3600)
}

pub fn services_with_ttl(ttl_seconds: i64) -> TestServices {
    let storage = Storage::in_memory();
    let issuer = TokenIssuer::new(&JwtConfig::new(TEST_SECRET).with_ttl_seconds(ttl_seconds));

    TestServices {
        auth: AuthService::new(storage.users, issuer.clone(), PasswordConfig::light()),
        tasks: TaskService::new(storage.tasks),
        issuer,
    }
}

pub fn titled(title: &str) -> TaskFields {
    TaskFields {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

/// Postgres URL for store tests, if one is configured
pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())
}
