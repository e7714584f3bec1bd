//! Middleware for the API server
//!
//! - `auth`: Bearer token gate for the task routes

pub mod auth;
