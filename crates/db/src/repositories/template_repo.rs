//! Repository for the `templates` table.

use sqlx::PgPool;
use uptemplate_core::template::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use uptemplate_core::types::DbId;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, width, height, created_at, updated_at";

/// Provides CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template owned by `owner_id`, returning the created row.
    ///
    /// Omitted canvas dimensions default to 800x600.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (owner_id, name, width, height)
             VALUES ($1, $2, COALESCE($3, $5), COALESCE($4, $6))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(input.width)
            .bind(input.height)
            .bind(DEFAULT_CANVAS_WIDTH)
            .bind(DEFAULT_CANVAS_HEIGHT)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the templates owned by a user, oldest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Template>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a template. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET
                name = COALESCE($2, name),
                width = COALESCE($3, width),
                height = COALESCE($4, height),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.width)
            .bind(input.height)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template and, by cascade, its layouts and shapes.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
