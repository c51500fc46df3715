//! Repository for the `vision_items` table.

use dreamboard_core::resources::DEFAULT_VISION_ITEM_TYPE;
use dreamboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::vision_item::{CreateVisionItem, VisionItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dream_id, title, description, type, url, created_at, updated_at";

/// Provides create/list operations for vision gallery items.
pub struct VisionItemRepo;

impl VisionItemRepo {
    /// Insert a new vision item under `dream_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        dream_id: DbId,
        input: &CreateVisionItem,
    ) -> Result<VisionItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO vision_items (dream_id, title, description, type, url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VisionItem>(&query)
            .bind(dream_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.item_type.as_deref().unwrap_or(DEFAULT_VISION_ITEM_TYPE))
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    /// List the vision items of a dream in creation order.
    pub async fn list_by_dream(
        pool: &PgPool,
        dream_id: DbId,
    ) -> Result<Vec<VisionItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vision_items WHERE dream_id = $1 ORDER BY id");
        sqlx::query_as::<_, VisionItem>(&query)
            .bind(dream_id)
            .fetch_all(pool)
            .await
    }
}
