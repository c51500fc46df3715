//! Vision gallery item model and DTOs.

use dreamboard_core::resources::MAX_VISION_ITEM_TYPE_LEN;
use dreamboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `vision_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionItem {
    pub id: DbId,
    pub dream_id: DbId,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub item_type: String,
    pub url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an item to a dream's vision gallery.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisionItem {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Defaults to `"image"` if omitted.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = MAX_VISION_ITEM_TYPE_LEN, message = "Type must be 1-20 characters"))]
    pub item_type: Option<String>,
    #[validate(url(message = "URL must be valid"))]
    pub url: String,
}
