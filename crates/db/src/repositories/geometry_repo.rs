//! Repository for the per-kind geometry tables.
//!
//! Geometry rows are only ever written as part of a shape write, so every
//! method takes a connection rather than the pool; callers pass the
//! transaction they are already in.

use sqlx::PgConnection;
use uptemplate_core::registry::ShapeKind;
use uptemplate_core::shape::{GeometryInput, GeometryPatch};
use uptemplate_core::types::DbId;

use crate::models::geometry::{Circle, Geometry, Media, Rectangle, Text};
use crate::models::media_content::MediaContent;
use crate::repositories::media_content_repo::COLUMNS as MEDIA_CONTENT_COLUMNS;

const RECTANGLE_COLUMNS: &str = "id, width, height, created_at, updated_at";
const CIRCLE_COLUMNS: &str = "id, radius, created_at, updated_at";
const TEXT_COLUMNS: &str = "id, font_family, font_size, text, created_at, updated_at";
const MEDIA_COLUMNS: &str = "id, width, height, media_content_id, created_at, updated_at";

/// Provides insert, lookup and partial update for geometry rows.
pub struct GeometryRepo;

impl GeometryRepo {
    /// Insert the geometry row for a new shape, returning its id.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &GeometryInput,
    ) -> Result<DbId, sqlx::Error> {
        let id: DbId = match input {
            GeometryInput::Rectangle(g) => {
                sqlx::query_scalar(
                    "INSERT INTO rectangles (width, height) VALUES ($1, $2) RETURNING id",
                )
                .bind(g.width)
                .bind(g.height)
                .fetch_one(&mut *conn)
                .await?
            }
            GeometryInput::Circle(g) => {
                sqlx::query_scalar("INSERT INTO circles (radius) VALUES ($1) RETURNING id")
                    .bind(g.radius)
                    .fetch_one(&mut *conn)
                    .await?
            }
            GeometryInput::Text(g) => {
                sqlx::query_scalar(
                    "INSERT INTO texts (font_family, font_size, text)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(&g.font_family)
                .bind(g.font_size)
                .bind(&g.text)
                .fetch_one(&mut *conn)
                .await?
            }
            GeometryInput::Media(g) => {
                sqlx::query_scalar(
                    "INSERT INTO media (width, height, media_content_id)
                     VALUES ($1, $2, $3)
                     RETURNING id",
                )
                .bind(g.width)
                .bind(g.height)
                .bind(g.media_content)
                .fetch_one(&mut *conn)
                .await?
            }
        };
        Ok(id)
    }

    /// Load the geometry row of `kind` with the given id.
    ///
    /// Media geometry is returned together with the content it places.
    pub async fn find(
        conn: &mut PgConnection,
        kind: ShapeKind,
        id: DbId,
    ) -> Result<Option<Geometry>, sqlx::Error> {
        let geometry = match kind {
            ShapeKind::Rectangle => {
                let query = format!("SELECT {RECTANGLE_COLUMNS} FROM rectangles WHERE id = $1");
                sqlx::query_as::<_, Rectangle>(&query)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Geometry::Rectangle)
            }
            ShapeKind::Circle => {
                let query = format!("SELECT {CIRCLE_COLUMNS} FROM circles WHERE id = $1");
                sqlx::query_as::<_, Circle>(&query)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Geometry::Circle)
            }
            ShapeKind::Text => {
                let query = format!("SELECT {TEXT_COLUMNS} FROM texts WHERE id = $1");
                sqlx::query_as::<_, Text>(&query)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
                    .map(Geometry::Text)
            }
            ShapeKind::Media => {
                let query = format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1");
                let media = sqlx::query_as::<_, Media>(&query)
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?;
                match media {
                    Some(media) => {
                        let query = format!(
                            "SELECT {MEDIA_CONTENT_COLUMNS} FROM media_contents WHERE id = $1"
                        );
                        let content = sqlx::query_as::<_, MediaContent>(&query)
                            .bind(media.media_content_id)
                            .fetch_one(&mut *conn)
                            .await?;
                        Some(Geometry::Media { media, content })
                    }
                    None => None,
                }
            }
        };
        Ok(geometry)
    }

    /// Apply a partial update. Only `Some` fields in `patch` are written.
    ///
    /// Returns `false` if no row of the patch's kind has the given id.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        patch: &GeometryPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = match patch {
            GeometryPatch::Rectangle(p) => {
                sqlx::query(
                    "UPDATE rectangles SET
                        width = COALESCE($2, width),
                        height = COALESCE($3, height),
                        updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .bind(p.width)
                .bind(p.height)
                .execute(&mut *conn)
                .await?
            }
            GeometryPatch::Circle(p) => {
                sqlx::query(
                    "UPDATE circles SET
                        radius = COALESCE($2, radius),
                        updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .bind(p.radius)
                .execute(&mut *conn)
                .await?
            }
            GeometryPatch::Text(p) => {
                sqlx::query(
                    "UPDATE texts SET
                        font_family = COALESCE($2, font_family),
                        font_size = COALESCE($3, font_size),
                        text = COALESCE($4, text),
                        updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .bind(&p.font_family)
                .bind(p.font_size)
                .bind(&p.text)
                .execute(&mut *conn)
                .await?
            }
            GeometryPatch::Media(p) => {
                sqlx::query(
                    "UPDATE media SET
                        width = COALESCE($2, width),
                        height = COALESCE($3, height),
                        media_content_id = COALESCE($4, media_content_id),
                        updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(id)
                .bind(p.width)
                .bind(p.height)
                .bind(p.media_content)
                .execute(&mut *conn)
                .await?
            }
        };
        Ok(result.rows_affected() > 0)
    }

    /// Whether a geometry row of `kind` with the given id exists.
    pub async fn exists(
        conn: &mut PgConnection,
        kind: ShapeKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.geometry_table()
        );
        sqlx::query_scalar(&query).bind(id).fetch_one(conn).await
    }
}
