//! Handlers for a dream's vision gallery.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dreamboard_core::types::DbId;
use dreamboard_db::models::vision_item::{CreateVisionItem, VisionItem};
use dreamboard_db::repositories::VisionItemRepo;

use crate::error::AppResult;
use crate::extract::{JsonBody, Path};
use crate::handlers::owned_dream;
use crate::middleware::auth::SessionUser;
use crate::state::AppState;

/// GET /api/dreams/{id}/vision-items
pub async fn list(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
) -> AppResult<Json<Vec<VisionItem>>> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let items = VisionItemRepo::list_by_dream(&state.pool, dream_id).await?;
    Ok(Json(items))
}

/// POST /api/dreams/{id}/vision-items
pub async fn create(
    State(state): State<AppState>,
    user: SessionUser,
    Path(dream_id): Path<DbId>,
    body: JsonBody,
) -> AppResult<(StatusCode, Json<VisionItem>)> {
    owned_dream(&state.pool, dream_id, &user).await?;
    let input: CreateVisionItem = body.into_validated()?;
    let item = VisionItemRepo::create(&state.pool, dream_id, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
