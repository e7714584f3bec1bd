//! # TaskVault API Server Library
//!
//! HTTP surface of TaskVault: a multi-user task tracker with bearer token
//! authentication and owner-scoped task CRUD.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer token gate
//! - `response`: Uniform response envelope
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
