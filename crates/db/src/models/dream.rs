//! Dream entity model and DTOs.

use dreamboard_core::patch::nullable;
use dreamboard_core::types::{DbId, Timestamp};
use dreamboard_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Confidence assigned to a dream before any advisory result arrives.
pub const INITIAL_AI_CONFIDENCE: i32 = 75;

/// A dream row from the `dreams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub next_action: Option<String>,
    pub ai_confidence: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new dream. The owner comes from the session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDream {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    pub description: Option<String>,
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image: Option<String>,
}

/// DTO for updating an existing dream. All fields are optional.
///
/// Has no `user_id`: ownership is fixed at creation. Nullable columns use
/// `Option<Option<T>>`: `Some(None)` clears them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDream {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Cover image must be a valid URL"))]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub next_action: Option<Option<String>>,
    #[validate(range(min = 0, max = 100, message = "AI confidence must be between 0 and 100"))]
    pub ai_confidence: Option<i32>,
}
