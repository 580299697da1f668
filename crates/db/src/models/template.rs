//! Template model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uptemplate_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new template. The owner always comes from the
/// authenticated identity, never from the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplate {
    #[validate(length(min = 1, max = 64, message = "Must be between 1 and 64 characters"))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "Must be greater than 0"))]
    pub width: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Must be greater than 0"))]
    pub height: Option<f64>,
}

/// DTO for updating an existing template. All fields are optional; the
/// owner cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTemplate {
    #[validate(length(min = 1, max = 64, message = "Must be between 1 and 64 characters"))]
    pub name: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Must be greater than 0"))]
    pub width: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Must be greater than 0"))]
    pub height: Option<f64>,
}
