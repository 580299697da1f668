//! Repository for the `layouts` table.

use sqlx::{PgExecutor, PgPool};
use uptemplate_core::types::DbId;

use crate::models::layout::Layout;

const COLUMNS: &str = "id, template_id, created_at, updated_at";

/// Provides create, lookup and delete for layouts.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Add a layout to a template. Returns `None` if the template is gone,
    /// including when it is deleted while the insert runs.
    pub async fn create(
        pool: &PgPool,
        template_id: DbId,
    ) -> Result<Option<Layout>, sqlx::Error> {
        let query = format!(
            "INSERT INTO layouts (template_id) \
             SELECT id FROM templates WHERE id = $1 FOR KEY SHARE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Layout>(&query)
            .bind(template_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Layout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM layouts WHERE id = $1");
        sqlx::query_as::<_, Layout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a layout by ID, only if it belongs to the given template.
    pub async fn find_in_template(
        pool: &PgPool,
        template_id: DbId,
        id: DbId,
    ) -> Result<Option<Layout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM layouts WHERE id = $1 AND template_id = $2");
        sqlx::query_as::<_, Layout>(&query)
            .bind(id)
            .bind(template_id)
            .fetch_optional(pool)
            .await
    }

    /// List the layouts of a template in creation order.
    pub async fn list_by_template<'e, E: PgExecutor<'e>>(
        executor: E,
        template_id: DbId,
    ) -> Result<Vec<Layout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM layouts WHERE template_id = $1 ORDER BY id");
        sqlx::query_as::<_, Layout>(&query)
            .bind(template_id)
            .fetch_all(executor)
            .await
    }

    /// Delete a layout and, by cascade, its shapes. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM layouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
