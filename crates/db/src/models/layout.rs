//! Layout model.
//!
//! A layout is a container of shapes inside a template. It has no
//! editable columns of its own, so there is no update DTO.

use serde::Serialize;
use sqlx::FromRow;
use uptemplate_core::types::{DbId, Timestamp};

/// A row from the `layouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Layout {
    pub id: DbId,
    pub template_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
