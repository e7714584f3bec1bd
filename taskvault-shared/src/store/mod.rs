//! Persistence interfaces
//!
//! The services only ever talk to storage through [`UserStore`] and
//! [`TaskStore`]. Two backends are provided:
//!
//! - [`postgres`]: sqlx/PostgreSQL, used in production
//! - [`memory`]: process-local maps, used by tests and when no
//!   `DATABASE_URL` is configured
//!
//! Each mutation touches exactly one record, so neither backend needs
//! multi-record transactions.
//!
//! # Example
//!
//! ```
//! use taskvault_shared::store::Storage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Storage::in_memory();
//! assert!(storage.users.find_by_username("alice").await?.is_none());
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{NewTask, Task, TaskFields};
use crate::models::user::{CreateUser, User};

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// The backing database failed
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// The backend is unreachable or shut down
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) {
            return StoreError::Unavailable(err.to_string());
        }
        StoreError::Database(err)
    }
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Finds a user by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Inserts a user
    ///
    /// Fails with `StoreError::Duplicate` if the username is taken.
    async fn insert(&self, data: CreateUser) -> StoreResult<User>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Task store
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task and returns the stored record
    async fn insert(&self, data: NewTask) -> StoreResult<Task>;

    /// Finds a task by ID regardless of owner
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Lists an owner's tasks, newest-created first
    ///
    /// With `completed = Some(flag)` only tasks whose flag matches exactly
    /// are returned.
    async fn find_by_owner(&self, owner_id: Uuid, completed: Option<bool>)
        -> StoreResult<Vec<Task>>;

    /// Applies a partial update and refreshes `updated_at`
    ///
    /// Returns `None` if the task does not exist.
    async fn update_by_id(&self, id: Uuid, changes: TaskFields) -> StoreResult<Option<Task>>;

    /// Permanently deletes a task
    ///
    /// Returns `true` if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;
}

/// The pair of stores the services run against
#[derive(Clone)]
pub struct Storage {
    /// Credential store
    pub users: Arc<dyn UserStore>,

    /// Task store
    pub tasks: Arc<dyn TaskStore>,
}

impl Storage {
    /// PostgreSQL-backed storage sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserStore::new(pool.clone())),
            tasks: Arc::new(postgres::PgTaskStore::new(pool)),
        }
    }

    /// Fresh, empty in-memory storage
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserStore::default()),
            tasks: Arc::new(memory::MemoryTaskStore::default()),
        }
    }
}
