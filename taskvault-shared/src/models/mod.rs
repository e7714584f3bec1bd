//! Domain models for TaskVault
//!
//! # Models
//!
//! - `user`: Accounts, roles and credentials
//! - `task`: Owner-scoped to-do items and their create/update payloads
//!
//! Persistence lives behind the traits in [`crate::store`]; these types are
//! shared by every store backend.

pub mod task;
pub mod user;
