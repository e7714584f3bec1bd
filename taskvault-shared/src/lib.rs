//! # TaskVault Shared Library
//!
//! This crate contains the domain types, authentication primitives, storage
//! abstractions and services used by the TaskVault API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT issuance/verification, bearer extraction
//! - `db`: PostgreSQL pool and migrations
//! - `error`: Service-level error taxonomy
//! - `models`: Users and tasks
//! - `services`: Registration/login and owner-scoped task operations
//! - `store`: Persistence traits with PostgreSQL and in-memory backends

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the TaskVault shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
