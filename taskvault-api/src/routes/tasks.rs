//! Task endpoints
//!
//! All handlers run behind the bearer token gate and act on behalf of the
//! authenticated user only. Task ids arrive as raw path segments; one that
//! is not a UUID is reported as `Task not found`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use taskvault_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskFields},
    services::tasks::parse_task_id,
};

use crate::{app::AppState, error::ApiResult, response::Envelope};

/// Query string of `GET /api/tasks/status`
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    /// `true` selects completed tasks; any other value selects open ones
    pub completed: Option<String>,
}

impl StatusQuery {
    /// Only the literal `true` means completed
    pub fn completed(&self) -> bool {
        self.completed.as_deref() == Some("true")
    }
}

/// `GET /api/tasks` - the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Envelope<Vec<Task>>> {
    let tasks = state.tasks.list(auth.user_id).await?;
    Ok(Envelope::ok(tasks))
}

/// `GET /api/tasks/status?completed=true|false`
pub async fn list_tasks_by_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Envelope<Vec<Task>>> {
    let tasks = state
        .tasks
        .list_by_status(auth.user_id, query.completed())
        .await?;
    Ok(Envelope::ok(tasks))
}

/// `GET /api/tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<Task>> {
    let task = state.tasks.get_by_id(auth.user_id, parse_task_id(&id)?).await?;
    Ok(Envelope::ok(task))
}

/// `POST /api/tasks`
///
/// ```text
/// { "title": "Buy milk", "description": "2L", "completed": false,
///   "subject": "errands", "dueDate": "2025-01-04" }
/// ```
///
/// Only `title` is required.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> ApiResult<Envelope<Task>> {
    let Json(fields) = body?;

    let task = state.tasks.create(auth.user_id, fields).await?;

    Ok(Envelope::with_message(task, "Task created successfully"))
}

/// `PUT /api/tasks/:id` - partial update, any subset of fields
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<TaskFields>, JsonRejection>,
) -> ApiResult<Envelope<Task>> {
    let task_id = parse_task_id(&id)?;
    let Json(changes) = body?;

    let task = state.tasks.update(auth.user_id, task_id, changes).await?;

    Ok(Envelope::with_message(task, "Task updated successfully"))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Envelope<()>> {
    state.tasks.delete(auth.user_id, parse_task_id(&id)?).await?;
    Ok(Envelope::empty("Task removed"))
}
