//! Handlers for dream resources.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dreamboard_core::types::DbId;
use dreamboard_db::models::resource::{CreateResource, Resource};
use dreamboard_db::repositories::ResourceRepo;

use crate::error::AppResult;
use crate::extract::{JsonBody, Path};
use crate::handlers::owned_dream;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// GET /api/dreams/{id}/resources
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
) -> AppResult<Json<Vec<Resource>>> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let resources = ResourceRepo::list_by_dream(&state.pool, dream_id).await?;
    Ok(Json(resources))
}

/// POST /api/dreams/{id}/resources
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<Resource>)> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let input: CreateResource = body.into_validated()?;
    let resource = ResourceRepo::create(&state.pool, dream_id, &input).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}
