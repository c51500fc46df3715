//! Handlers for dream tasks.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use dreamboard_core::error::CoreError;
use dreamboard_core::tasks::completes_task;
use dreamboard_core::types::DbId;
use dreamboard_db::models::task::{CreateTask, Task, UpdateTask};
use dreamboard_db::repositories::TaskRepo;
use dreamboard_db::DbPool;

use crate::background::enrichment::EnrichmentJob;
use crate::error::AppResult;
use crate::extract::{JsonBody, Path};
use crate::handlers::owned_dream;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// Load a task whose dream belongs to `user`.
async fn owned_task(pool: &DbPool, id: DbId, user: &SessionUser) -> AppResult<Task> {
    let task = TaskRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;
    owned_dream(pool, task.dream_id, user).await?;
    Ok(task)
}

/// GET /api/dreams/{id}/tasks
///
/// Pending tasks first (High to Low, then earliest due date), done tasks last.
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
) -> AppResult<Json<Vec<Task>>> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let tasks = TaskRepo::list_by_dream(&state.pool, dream_id).await?;
    Ok(Json(tasks))
}

/// POST /api/dreams/{id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<Task>)> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let input: CreateTask = body.into_validated()?;

    let task = TaskRepo::create(&state.pool, dream_id, &input).await?;
    tracing::info!(task_id = task.id, dream_id, "Task created");

    state.enrichment.enqueue(EnrichmentJob::Progress { dream_id });
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/{id}
///
/// Moving a task into Done stamps `completedAt`; a status change of any kind
/// queues a progress refresh for its dream.
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
    body: JsonBody,
) -> AppResult<Json<Task>> {
    let current = owned_task(&state.pool, id, &user).await?;
    let input: UpdateTask = body.into_validated()?;

    let status_changed = input.status.is_some_and(|next| next != current.status);
    let completed_at = input
        .status
        .filter(|&next| completes_task(current.status, next))
        .map(|_| Utc::now());

    let task = TaskRepo::update(&state.pool, id, &input, completed_at)
        .await?
        .ok_or(CoreError::NotFound { entity: "Task", id })?;

    if status_changed {
        tracing::info!(
            task_id = id,
            from = %current.status,
            to = %task.status,
            "Task status changed"
        );
        state.enrichment.enqueue(EnrichmentJob::Progress {
            dream_id: task.dream_id,
        });
    }
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_task(&state.pool, id, &user).await?;

    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Task", id }.into());
    }
    Ok(StatusCode::NO_CONTENT)
}
