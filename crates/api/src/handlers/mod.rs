//! Request handlers.
//!
//! Each submodule serves one resource. Handlers authenticate through
//! [`SessionUser`], check ownership with [`owned_dream`], and only then
//! parse the request body.

pub mod auth;
pub mod dream;
pub mod resource;
pub mod task;
pub mod vision_item;

use dreamboard_core::error::CoreError;
use dreamboard_core::types::DbId;
use dreamboard_db::models::dream::Dream;
use dreamboard_db::repositories::DreamRepo;
use dreamboard_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SessionUser;

/// Load a dream and verify it belongs to `user`.
///
/// 404 if the dream does not exist, 403 if someone else owns it.
pub(crate) async fn owned_dream(
    pool: &DbPool,
    dream_id: DbId,
    user: &SessionUser,
) -> AppResult<Dream> {
    let dream = DreamRepo::find_by_id(pool, dream_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Dream",
            id: dream_id,
        })?;

    if dream.user_id != user.user_id {
        tracing::debug!(
            dream_id,
            user_id = user.user_id,
            owner_id = dream.user_id,
            "Rejected access to foreign dream"
        );
        return Err(AppError::forbidden("You do not have access to this dream"));
    }
    Ok(dream)
}
