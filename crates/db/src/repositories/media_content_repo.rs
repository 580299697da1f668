//! Repository for the `media_contents` table.

use sqlx::PgPool;
use uptemplate_core::registry::ShapeKind;
use uptemplate_core::types::DbId;

use crate::models::media_content::{CreateMediaContent, MediaContent};

/// Column list shared with the geometry repository, which loads the
/// content placed by a media row.
pub(crate) const COLUMNS: &str =
    "id, owner_id, content, original_width, original_height, alt, created_at, updated_at";

/// Provides CRUD operations for uploaded media contents.
pub struct MediaContentRepo;

impl MediaContentRepo {
    /// Insert a new media content owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateMediaContent,
    ) -> Result<MediaContent, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_contents (owner_id, content, original_width, original_height, alt)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaContent>(&query)
            .bind(owner_id)
            .bind(&input.content)
            .bind(input.original_width)
            .bind(input.original_height)
            .bind(&input.alt)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaContent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_contents WHERE id = $1");
        sqlx::query_as::<_, MediaContent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<MediaContent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_contents WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, MediaContent>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a media content together with every Image shape placing it.
    ///
    /// The row is locked before the shapes are removed: a shape write that
    /// already holds it finishes first and its shape is removed too, and a
    /// later one fails its existence check.
    ///
    /// Returns the deleted row so the caller can release its blob, or
    /// `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<MediaContent>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM media_contents WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let shapes = sqlx::query(
            "DELETE FROM shapes
             WHERE kind = $1
               AND geometry_id IN (SELECT id FROM media WHERE media_content_id = $2)",
        )
        .bind(ShapeKind::Media.tag())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let query = format!("DELETE FROM media_contents WHERE id = $1 RETURNING {COLUMNS}");
        let deleted = sqlx::query_as::<_, MediaContent>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        if deleted.is_some() {
            tracing::debug!(
                media_content_id = id,
                shapes = shapes.rows_affected(),
                "Media content deleted"
            );
        }
        Ok(deleted)
    }
}
