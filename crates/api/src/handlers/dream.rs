//! Handlers for `/api/dreams`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dreamboard_core::error::CoreError;
use dreamboard_core::types::DbId;
use dreamboard_db::models::dream::{CreateDream, Dream, UpdateDream};
use dreamboard_db::repositories::DreamRepo;

use crate::background::enrichment::EnrichmentJob;
use crate::error::AppResult;
use crate::extract::{JsonBody, Path};
use crate::handlers::owned_dream;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// GET /api/dreams
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
) -> AppResult<Json<Vec<Dream>>> {
    let dreams = DreamRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(dreams))
}

/// POST /api/dreams
///
/// Responds with the dream as inserted; the AI timeline and resources are
/// attached later by the enrichment worker.
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<Dream>)> {
    let input: CreateDream = body.into_validated()?;
    let dream = DreamRepo::create(&state.pool, user.user_id, &input).await?;
    tracing::info!(dream_id = dream.id, user_id = user.user_id, "Dream created");

    state.enrichment.enqueue(EnrichmentJob::NewDream {
        dream_id: dream.id,
        title: dream.title.clone(),
        description: dream.description.clone(),
    });

    Ok((StatusCode::CREATED, Json(dream)))
}

/// GET /api/dreams/{id}
pub async fn get(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Dream>> {
    let dream = owned_dream(&state.pool, id, &user).await?;
    Ok(Json(dream))
}

/// PATCH /api/dreams/{id}
pub async fn update(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
    body: JsonBody,
) -> AppResult<Json<Dream>> {
    owned_dream(&state.pool, id, &user).await?;
    let input: UpdateDream = body.into_validated()?;

    let dream = DreamRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Dream", id })?;
    Ok(Json(dream))
}

/// DELETE /api/dreams/{id}
///
/// Removes the dream together with its tasks, resources and vision items.
pub async fn delete(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_dream(&state.pool, id, &user).await?;

    if !DreamRepo::delete(&state.pool, id).await? {
        return Err(CoreError::NotFound { entity: "Dream", id }.into());
    }
    tracing::info!(dream_id = id, user_id = user.user_id, "Dream deleted");
    Ok(StatusCode::NO_CONTENT)
}
