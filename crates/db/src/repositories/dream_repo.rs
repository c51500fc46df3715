//! Repository for the `dreams` table.

use dreamboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::dream::{CreateDream, Dream, UpdateDream, INITIAL_AI_CONFIDENCE};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, cover_image, next_action, \
                        ai_confidence, created_at, updated_at";

/// Provides CRUD operations for dreams.
pub struct DreamRepo;

impl DreamRepo {
    /// Insert a new dream owned by `user_id`, returning the created row.
    ///
    /// New dreams start with an empty next action and the initial confidence
    /// until advisory enrichment replaces them.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateDream,
    ) -> Result<Dream, sqlx::Error> {
        let query = format!(
            "INSERT INTO dreams (user_id, title, description, cover_image, next_action, ai_confidence)
             VALUES ($1, $2, $3, $4, '', $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dream>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.cover_image)
            .bind(INITIAL_AI_CONFIDENCE)
            .fetch_one(pool)
            .await
    }

    /// Find a dream by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dream>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dreams WHERE id = $1");
        sqlx::query_as::<_, Dream>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all dreams owned by a user, oldest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Dream>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dreams WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, Dream>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a dream. Only fields present in `input` are applied.
    ///
    /// `Some(None)` clears a nullable column.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDream,
    ) -> Result<Option<Dream>, sqlx::Error> {
        let query = format!(
            "UPDATE dreams SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                cover_image = CASE WHEN $5 THEN $6 ELSE cover_image END,
                next_action = CASE WHEN $7 THEN $8 ELSE next_action END,
                ai_confidence = COALESCE($9, ai_confidence)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dream>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.cover_image.is_some())
            .bind(input.cover_image.as_ref().and_then(|v| v.as_deref()))
            .bind(input.next_action.is_some())
            .bind(input.next_action.as_ref().and_then(|v| v.as_deref()))
            .bind(input.ai_confidence)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the advisory fields of a dream.
    ///
    /// Returns `None` if the dream no longer exists (e.g. it was deleted while
    /// an advisory call was in flight).
    pub async fn update_advice(
        pool: &PgPool,
        id: DbId,
        next_action: &str,
        ai_confidence: i32,
    ) -> Result<Option<Dream>, sqlx::Error> {
        let query = format!(
            "UPDATE dreams SET next_action = $2, ai_confidence = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dream>(&query)
            .bind(id)
            .bind(next_action)
            .bind(ai_confidence)
            .fetch_optional(pool)
            .await
    }

    /// Delete a dream together with its vision items, resources and tasks.
    ///
    /// Dependents are removed first, all in one transaction. The dream row is
    /// locked up front so a concurrent insert of a dependent waits for the
    /// delete and then fails its foreign key check instead of this delete.
    /// Returns `true` if the dream existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM dreams WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        for table in ["vision_items", "resources", "tasks"] {
            let removed = sqlx::query(&format!("DELETE FROM {table} WHERE dream_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            tracing::debug!(dream_id = id, table, removed, "Removed dream dependents");
        }

        let result = sqlx::query("DELETE FROM dreams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
