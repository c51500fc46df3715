//! Task entity model and DTOs.

use dreamboard_core::patch::nullable;
use dreamboard_core::tasks::{TaskOrderKey, TaskPriority, TaskStatus};
use dreamboard_core::types::{DbId, Timestamp};
use dreamboard_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub dream_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TaskOrderKey for Task {
    fn status(&self) -> TaskStatus {
        self.status
    }

    fn priority(&self) -> TaskPriority {
        self.priority
    }

    fn due_date(&self) -> Option<Timestamp> {
        self.due_date
    }
}

/// DTO for creating a task. The parent dream comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `To-Do` if omitted.
    pub status: Option<TaskStatus>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
}

/// DTO for updating an existing task. All fields are optional.
///
/// Nullable columns use `Option<Option<T>>`: `Some(None)` clears them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<Timestamp>>,
}
