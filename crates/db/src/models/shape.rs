//! Shape placement model.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;
use uptemplate_core::error::CoreError;
use uptemplate_core::registry::ShapeKind;
use uptemplate_core::types::{DbId, KindTag, Timestamp};

/// A row from the `shapes` table: transform, style and shadow of one
/// placed shape plus the `(kind, geometry_id)` reference to its geometry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shape {
    pub id: DbId,
    pub layout_id: DbId,
    pub kind: KindTag,
    pub geometry_id: DbId,
    // Transform
    pub x: f64,
    pub y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    // Style
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    // Shadow
    pub shadow_color: String,
    pub shadow_blur: f64,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_opacity: f64,
    pub draggable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Shape {
    /// Resolve the persisted kind tag through the registry.
    pub fn shape_kind(&self) -> Result<ShapeKind, CoreError> {
        ShapeKind::from_tag(self.kind)
    }

    /// Every column as a snake_case mapping, for the representation codec.
    pub fn fields(&self) -> Result<Map<String, Value>, CoreError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(CoreError::Internal("Shape did not serialize to an object".into())),
            Err(e) => Err(CoreError::Internal(format!("Shape serialization failed: {e}"))),
        }
    }
}
