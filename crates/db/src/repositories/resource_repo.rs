//! Repository for the `resources` table.

use dreamboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::resource::{CreateResource, Resource};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dream_id, title, description, type, url, is_verified, is_free, \
                        read_time, duration, created_at, updated_at";

/// Provides create/list operations for resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new resource under `dream_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        dream_id: DbId,
        input: &CreateResource,
    ) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources
                (dream_id, title, description, type, url, is_verified, is_free, read_time, duration)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, false), COALESCE($7, true), $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(dream_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.resource_type.as_str())
            .bind(&input.url)
            .bind(input.is_verified)
            .bind(input.is_free)
            .bind(input.read_time)
            .bind(input.duration)
            .fetch_one(pool)
            .await
    }

    /// List the resources of a dream in creation order.
    pub async fn list_by_dream(
        pool: &PgPool,
        dream_id: DbId,
    ) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE dream_id = $1 ORDER BY id");
        sqlx::query_as::<_, Resource>(&query)
            .bind(dream_id)
            .fetch_all(pool)
            .await
    }
}
