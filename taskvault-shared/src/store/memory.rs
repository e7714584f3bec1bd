//! In-memory store backend
//!
//! Records live in `tokio::sync::RwLock`-guarded maps. Username uniqueness
//! is checked and the user inserted under a single write lock, so two racing
//! registrations for the same name cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::task::{NewTask, Task, TaskFields};
use crate::models::user::{CreateUser, User};

/// In-memory credential store
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == data.username) {
            return Err(StoreError::Duplicate(format!("username '{}'", data.username)));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// In-memory task store
///
/// Tasks are kept in insertion order next to an id index, so tasks created
/// within the same clock tick still list newest-first.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    inner: RwLock<TaskTable>,
}

#[derive(Debug, Default)]
struct TaskTable {
    rows: Vec<Task>,
    index: HashMap<Uuid, usize>,
}

impl TaskTable {
    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(pos, task)| (task.id, pos))
            .collect();
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, data: NewTask) -> StoreResult<Task> {
        let task = Task::from_new(Uuid::new_v4(), data, Utc::now());

        let mut table = self.inner.write().await;
        let pos = table.rows.len();
        table.index.insert(task.id, pos);
        table.rows.push(task.clone());

        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let table = self.inner.read().await;
        Ok(table.index.get(&id).map(|&pos| table.rows[pos].clone()))
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        completed: Option<bool>,
    ) -> StoreResult<Vec<Task>> {
        let table = self.inner.read().await;

        let mut tasks: Vec<Task> = table
            .rows
            .iter()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .filter(|t| completed.map_or(true, |flag| t.completed == flag))
            .cloned()
            .collect();

        // Stable: equal timestamps keep reverse-insertion order
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(tasks)
    }

    async fn update_by_id(&self, id: Uuid, changes: TaskFields) -> StoreResult<Option<Task>> {
        let mut table = self.inner.write().await;

        let Some(&pos) = table.index.get(&id) else {
            return Ok(None);
        };

        let task = &mut table.rows[pos];
        task.merge(changes, Utc::now());

        Ok(Some(task.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let mut table = self.inner.write().await;
        let found = table.index.get(&id).copied();

        match found {
            Some(pos) => {
                table.rows.remove(pos);
                table.reindex();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
