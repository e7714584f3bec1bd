//! Task model
//!
//! A task is a personal to-do item. Every task has exactly one owner, set at
//! creation from the caller's identity and never changed afterwards.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     title TEXT NOT NULL,
//!     description VARCHAR(500),
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     subject TEXT,
//!     due_date TIMESTAMPTZ,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "id": "550e8400-e29b-41d4-a716-446655440000",
//!   "title": "Buy milk",
//!   "description": null,
//!   "completed": false,
//!   "subject": "errands",
//!   "dueDate": "2025-01-04T00:00:00Z",
//!   "createdAt": "2025-01-03T12:00:00Z",
//!   "updatedAt": "2025-01-03T12:00:00Z",
//!   "user": "8d2f0c4e-1b7a-4f5e-9c3d-2a6b8e0f1d4c"
//! }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A persisted task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title (never empty)
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Whether the task is done
    pub completed: bool,

    /// Optional free-form category
    pub subject: Option<String>,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,

    /// Owning user
    #[serde(rename = "user")]
    pub owner_id: Uuid,
}

impl Task {
    /// Builds a task record from validated creation input
    pub fn from_new(id: Uuid, data: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            subject: data.subject,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
            owner_id: data.owner_id,
        }
    }

    /// Whether `user_id` owns this task
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// Applies a partial update
    ///
    /// Fields present in `changes` overwrite; absent fields are kept.
    /// `updated_at` is always refreshed. The owner is never touched.
    pub fn merge(&mut self, changes: TaskFields, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(subject) = changes.subject {
            self.subject = Some(subject);
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = now;
    }
}

/// Task fields as sent by clients
///
/// Used for both creation and partial update. Every field is optional on the
/// wire; creation additionally requires `title`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    /// Title (non-empty when present)
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    /// Description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Completion flag
    pub completed: Option<bool>,

    /// Subject/category
    pub subject: Option<String>,

    /// Deadline, RFC 3339 or plain `YYYY-MM-DD`
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskFields {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.subject.is_none()
            && self.due_date.is_none()
    }
}

/// Validated input for inserting a task
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    /// Owning user
    pub owner_id: Uuid,

    /// Title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Completion flag (false unless given)
    pub completed: bool,

    /// Subject
    pub subject: Option<String>,

    /// Deadline
    pub due_date: Option<DateTime<Utc>>,
}

/// Parses a due date given as RFC 3339 or as a bare calendar date
///
/// Bare dates are taken as midnight UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("invalid dueDate '{}': expected RFC 3339 or YYYY-MM-DD", raw))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_due_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
