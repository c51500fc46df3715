//! Recommended resource model and DTOs.

use dreamboard_core::resources::ResourceType;
use dreamboard_core::types::{DbId, Timestamp};
use dreamboard_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A resource row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: DbId,
    pub dream_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub resource_type: ResourceType,
    pub url: String,
    pub is_verified: bool,
    pub is_free: bool,
    /// Estimated reading time in minutes (articles).
    pub read_time: Option<i32>,
    /// Running time in minutes (videos).
    pub duration: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a resource. The parent dream comes from the URL.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    #[validate(
        length(min = 1, max = 200, message = "Title must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[validate(url(message = "URL must be valid"))]
    pub url: String,
    /// Defaults to `false` if omitted.
    pub is_verified: Option<bool>,
    /// Defaults to `true` if omitted.
    pub is_free: Option<bool>,
    #[validate(range(min = 0, message = "Read time cannot be negative"))]
    pub read_time: Option<i32>,
    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration: Option<i32>,
}
