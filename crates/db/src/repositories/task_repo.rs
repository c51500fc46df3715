//! Repository for the `tasks` table.

use dreamboard_core::tasks::order_tasks;
use dreamboard_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dream_id, title, description, status, priority, due_date, \
                        completed_at, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task under `dream_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        dream_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (dream_id, title, description, status, priority, due_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(dream_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.unwrap_or_default().as_str())
            .bind(input.priority.unwrap_or_default().as_str())
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the tasks of a dream in display order.
    ///
    /// Pending tasks first (High, Medium, Low, then earliest due date), then
    /// Done tasks in the order they were created.
    pub async fn list_by_dream(pool: &PgPool, dream_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE dream_id = $1 ORDER BY id");
        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(dream_id)
            .fetch_all(pool)
            .await?;
        Ok(order_tasks(tasks))
    }

    /// Update a task. Only fields present in `input` are applied.
    ///
    /// `Some(None)` clears `description` or `due_date`. `completed_at` is
    /// decided by the caller; `None` keeps the stored value.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = CASE WHEN $7 THEN $8 ELSE due_date END,
                completed_at = COALESCE($9, completed_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Returns `true` if the row existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
