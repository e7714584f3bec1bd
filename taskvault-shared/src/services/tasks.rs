//! Owner-scoped task operations
//!
//! Every single-task operation goes through [`TaskService::ensure_owner`]:
//! a missing task is `NotFound`, a task owned by someone else is
//! `Forbidden`. Existence is checked first, so a caller can tell "no such
//! task" apart from "not yours".

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Task, TaskFields};
use crate::store::TaskStore;

/// Parses a task id from a path segment
///
/// Anything that is not a UUID cannot name a task, so it is `NotFound`
/// rather than a validation error.
pub fn parse_task_id(raw: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::NotFound)
}

/// Task CRUD with ownership enforcement
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    /// Creates the service
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Creates a task owned by `owner_id`
    ///
    /// `title` is required; `completed` defaults to false.
    pub async fn create(&self, owner_id: Uuid, fields: TaskFields) -> ServiceResult<Task> {
        fields.validate()?;

        let title = fields
            .title
            .ok_or_else(|| ServiceError::Validation("Title is required".to_string()))?;

        let task = self
            .tasks
            .insert(NewTask {
                owner_id,
                title,
                description: fields.description,
                completed: fields.completed.unwrap_or(false),
                subject: fields.subject,
                due_date: fields.due_date,
            })
            .await?;

        info!(task_id = %task.id, user_id = %owner_id, "Task created");
        Ok(task)
    }

    /// All of the owner's tasks, newest first
    pub async fn list(&self, owner_id: Uuid) -> ServiceResult<Vec<Task>> {
        let tasks = self.tasks.find_by_owner(owner_id, None).await?;
        debug!(user_id = %owner_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// The owner's tasks whose `completed` flag equals `completed`
    pub async fn list_by_status(&self, owner_id: Uuid, completed: bool) -> ServiceResult<Vec<Task>> {
        let tasks = self.tasks.find_by_owner(owner_id, Some(completed)).await?;
        debug!(user_id = %owner_id, completed, count = tasks.len(), "Listed tasks by status");
        Ok(tasks)
    }

    /// Fetches one task
    ///
    /// # Errors
    ///
    /// `NotFound` if it does not exist, then `Forbidden` if it is not owned
    /// by `owner_id`
    pub async fn get_by_id(&self, owner_id: Uuid, task_id: Uuid) -> ServiceResult<Task> {
        self.ensure_owner(owner_id, task_id).await
    }

    /// Applies a partial update
    ///
    /// Present fields overwrite, absent fields are kept, and `updated_at`
    /// is refreshed. The same validation rules as `create` apply to the
    /// present fields.
    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        changes: TaskFields,
    ) -> ServiceResult<Task> {
        self.ensure_owner(owner_id, task_id).await?;
        changes.validate()?;

        let task = self
            .tasks
            .update_by_id(task_id, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!(task_id = %task.id, user_id = %owner_id, "Task updated");
        Ok(task)
    }

    /// Permanently removes a task
    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> ServiceResult<()> {
        self.ensure_owner(owner_id, task_id).await?;

        if !self.tasks.delete_by_id(task_id).await? {
            // Removed between the guard and the delete
            return Err(ServiceError::NotFound);
        }

        info!(task_id = %task_id, user_id = %owner_id, "Task deleted");
        Ok(())
    }

    async fn ensure_owner(&self, owner_id: Uuid, task_id: Uuid) -> ServiceResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if !task.is_owned_by(owner_id) {
            warn!(task_id = %task_id, user_id = %owner_id, "Access to foreign task denied");
            return Err(ServiceError::Forbidden);
        }

        Ok(task)
    }
}
