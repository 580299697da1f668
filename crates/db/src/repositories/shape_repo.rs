//! Repository for the `shapes` table.
//!
//! Writes touch both the shape row and its geometry row, so `create` and
//! `update` run inside a single transaction and return the pair. The rows a
//! write references (the layout, a placed media content) are key-share
//! locked first, so a concurrent delete of either waits for the write.
//!
//! Reads are generic over the executor so the representation layer can run
//! them inside its snapshot transaction.

use sqlx::{PgConnection, PgExecutor, PgPool};
use uptemplate_core::error::CoreError;
use uptemplate_core::shape::{NewShape, ShapeUpdate, MEDIA_CONTENT_FIELD};
use uptemplate_core::types::DbId;

use crate::error::DbError;
use crate::models::geometry::Geometry;
use crate::models::shape::Shape;
use crate::repositories::GeometryRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, layout_id, kind, geometry_id, \
    x, y, offset_x, offset_y, scale_x, scale_y, rotation, \
    fill, stroke, stroke_width, opacity, \
    shadow_color, shadow_blur, shadow_offset_x, shadow_offset_y, shadow_opacity, \
    draggable, created_at, updated_at";

/// Provides CRUD operations for shapes and their owned geometry.
pub struct ShapeRepo;

impl ShapeRepo {
    /// Insert the geometry row, then the shape row referencing it.
    ///
    /// Both rows are written in one transaction; a failure on the shape
    /// insert leaves no geometry behind.
    pub async fn create(
        pool: &PgPool,
        layout_id: DbId,
        input: &NewShape,
    ) -> Result<(Shape, Geometry), DbError> {
        let kind = input.kind();
        let p = &input.placement;
        let mut tx = pool.begin().await?;

        let layout: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM layouts WHERE id = $1 FOR KEY SHARE")
                .bind(layout_id)
                .fetch_optional(&mut *tx)
                .await?;
        if layout.is_none() {
            return Err(CoreError::NotFound {
                entity: "Layout",
                id: layout_id,
            }
            .into());
        }
        if let Some(media_content_id) = input.media_content() {
            lock_media_content(&mut *tx, media_content_id).await?;
        }

        let geometry_id = GeometryRepo::insert(&mut *tx, &input.geometry).await?;

        let query = format!(
            "INSERT INTO shapes (layout_id, kind, geometry_id,
                x, y, offset_x, offset_y, scale_x, scale_y, rotation,
                fill, stroke, stroke_width, opacity,
                shadow_color, shadow_blur, shadow_offset_x, shadow_offset_y, shadow_opacity,
                draggable)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                     $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
             RETURNING {COLUMNS}"
        );
        let shape = sqlx::query_as::<_, Shape>(&query)
            .bind(layout_id)
            .bind(kind.tag())
            .bind(geometry_id)
            .bind(p.x)
            .bind(p.y)
            .bind(p.offset_x)
            .bind(p.offset_y)
            .bind(p.scale_x)
            .bind(p.scale_y)
            .bind(p.rotation)
            .bind(&p.fill)
            .bind(&p.stroke)
            .bind(p.stroke_width)
            .bind(p.opacity)
            .bind(&p.shadow_color)
            .bind(p.shadow_blur)
            .bind(p.shadow_offset_x)
            .bind(p.shadow_offset_y)
            .bind(p.shadow_opacity)
            .bind(p.draggable)
            .fetch_one(&mut *tx)
            .await?;

        let geometry = GeometryRepo::find(&mut *tx, kind, geometry_id)
            .await?
            .ok_or(CoreError::ReferentialIntegrity {
                kind: kind.tag(),
                geometry_id,
            })?;

        tx.commit().await?;
        Ok((shape, geometry))
    }

    /// Find a shape by its internal ID.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Shape>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shapes WHERE id = $1");
        sqlx::query_as::<_, Shape>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a shape by ID, only if it belongs to the given layout.
    pub async fn find_in_layout<'e, E: PgExecutor<'e>>(
        executor: E,
        layout_id: DbId,
        id: DbId,
    ) -> Result<Option<Shape>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shapes WHERE id = $1 AND layout_id = $2");
        sqlx::query_as::<_, Shape>(&query)
            .bind(id)
            .bind(layout_id)
            .fetch_optional(executor)
            .await
    }

    /// List the shapes of a layout in creation order.
    pub async fn list_by_layout<'e, E: PgExecutor<'e>>(
        executor: E,
        layout_id: DbId,
    ) -> Result<Vec<Shape>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shapes WHERE layout_id = $1 ORDER BY id");
        sqlx::query_as::<_, Shape>(&query)
            .bind(layout_id)
            .fetch_all(executor)
            .await
    }

    /// Apply a partial update to a shape and its geometry atomically.
    ///
    /// The shape row is locked for the duration of the transaction. Empty
    /// halves of the update are skipped. Returns `None` if no shape with
    /// the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ShapeUpdate,
    ) -> Result<Option<(Shape, Geometry)>, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM shapes WHERE id = $1 FOR UPDATE");
        let Some(mut shape) = sqlx::query_as::<_, Shape>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let kind = shape.shape_kind()?;
        if input.geometry.kind() != kind {
            return Err(CoreError::Internal(format!(
                "{} geometry patch applied to a {kind} shape",
                input.geometry.kind()
            ))
            .into());
        }
        let missing_geometry = CoreError::ReferentialIntegrity {
            kind: shape.kind,
            geometry_id: shape.geometry_id,
        };
        if let Some(media_content_id) = input.geometry.media_content() {
            lock_media_content(&mut *tx, media_content_id).await?;
        }

        if !input.geometry.is_empty()
            && !GeometryRepo::update(&mut *tx, shape.geometry_id, &input.geometry).await?
        {
            return Err(missing_geometry.into());
        }

        if !input.placement.is_empty() {
            let p = &input.placement;
            let query = format!(
                "UPDATE shapes SET
                    x = COALESCE($2, x),
                    y = COALESCE($3, y),
                    offset_x = COALESCE($4, offset_x),
                    offset_y = COALESCE($5, offset_y),
                    scale_x = COALESCE($6, scale_x),
                    scale_y = COALESCE($7, scale_y),
                    rotation = COALESCE($8, rotation),
                    fill = COALESCE($9, fill),
                    stroke = COALESCE($10, stroke),
                    stroke_width = COALESCE($11, stroke_width),
                    opacity = COALESCE($12, opacity),
                    shadow_color = COALESCE($13, shadow_color),
                    shadow_blur = COALESCE($14, shadow_blur),
                    shadow_offset_x = COALESCE($15, shadow_offset_x),
                    shadow_offset_y = COALESCE($16, shadow_offset_y),
                    shadow_opacity = COALESCE($17, shadow_opacity),
                    draggable = COALESCE($18, draggable),
                    updated_at = NOW()
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            );
            shape = sqlx::query_as::<_, Shape>(&query)
                .bind(id)
                .bind(p.x)
                .bind(p.y)
                .bind(p.offset_x)
                .bind(p.offset_y)
                .bind(p.scale_x)
                .bind(p.scale_y)
                .bind(p.rotation)
                .bind(&p.fill)
                .bind(&p.stroke)
                .bind(p.stroke_width)
                .bind(p.opacity)
                .bind(&p.shadow_color)
                .bind(p.shadow_blur)
                .bind(p.shadow_offset_x)
                .bind(p.shadow_offset_y)
                .bind(p.shadow_opacity)
                .bind(p.draggable)
                .fetch_one(&mut *tx)
                .await?;
        }

        let geometry = GeometryRepo::find(&mut *tx, kind, shape.geometry_id)
            .await?
            .ok_or(missing_geometry)?;

        tx.commit().await?;
        Ok(Some((shape, geometry)))
    }

    /// Delete a shape by ID. Returns `true` if a row was removed.
    ///
    /// The `shapes_delete_geometry` trigger removes the owned geometry row
    /// in the same statement.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shapes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Key-share lock a media content for the rest of the transaction, so it
/// cannot be deleted while a shape is being pointed at it.
async fn lock_media_content(conn: &mut PgConnection, id: DbId) -> Result<(), DbError> {
    let found: Option<DbId> =
        sqlx::query_scalar("SELECT id FROM media_contents WHERE id = $1 FOR KEY SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(CoreError::field(MEDIA_CONTENT_FIELD, "Media content does not exist").into()),
    }
}
