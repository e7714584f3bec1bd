//! Application services
//!
//! The services sit between the HTTP layer and the stores. They own every
//! business rule: password hashing on registration, credential checks on
//! login, and the existence-then-ownership guard on task access.
//!
//! - [`auth::AuthService`]: registration, login, token verification
//! - [`tasks::TaskService`]: owner-scoped task CRUD

pub mod auth;
pub mod tasks;
