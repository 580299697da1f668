//! Shape placement fields, their defaults, and the typed create/update
//! inputs produced by the codec.
//!
//! Create and update inputs are separate types: every field of an update
//! is optional by construction, so a partial update can touch only the
//! transform, only the style, or only the geometry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::registry::ShapeKind;
use crate::types::DbId;
use crate::validation::{FieldSpec, FieldType};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_FILL: &str = "white";
pub const DEFAULT_STROKE: &str = "black";
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
pub const DEFAULT_OPACITY: f64 = 1.0;
pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_SHADOW_COLOR: &str = "black";
pub const DEFAULT_DRAGGABLE: bool = true;

/// Maximum length of the colour columns (`fill`, `stroke`, `shadow_color`).
pub const MAX_COLOR_LEN: usize = 32;

/// Wire name of the media reference an Image shape carries.
pub const MEDIA_CONTENT_FIELD: &str = "mediaContent";

/// Shape-owned fields (transform, style, shadow, draggable), snake_case.
pub const PLACEMENT_FIELDS: &[FieldSpec] = &[
    // Transform
    FieldSpec::number("x"),
    FieldSpec::number("y"),
    FieldSpec::number("offset_x"),
    FieldSpec::number("offset_y"),
    FieldSpec::number("scale_x"),
    FieldSpec::number("scale_y"),
    FieldSpec::number("rotation"),
    // Style
    FieldSpec::text("fill", MAX_COLOR_LEN),
    FieldSpec::text("stroke", MAX_COLOR_LEN),
    FieldSpec::non_negative("stroke_width"),
    FieldSpec::unit_interval("opacity"),
    // Shadow
    FieldSpec::text("shadow_color", MAX_COLOR_LEN),
    FieldSpec::non_negative("shadow_blur"),
    FieldSpec::number("shadow_offset_x"),
    FieldSpec::number("shadow_offset_y"),
    FieldSpec::unit_interval("shadow_opacity"),
    FieldSpec::new("draggable", FieldType::Boolean),
];

/// Whether `field` (snake_case) is stored on the shape row itself.
pub fn is_placement_field(field: &str) -> bool {
    PLACEMENT_FIELDS.iter().any(|f| f.name == field)
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Transform, style and shadow of a new shape. Omitted fields take their
/// documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementInput {
    pub x: f64,
    pub y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub shadow_color: String,
    pub shadow_blur: f64,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_opacity: f64,
    pub draggable: bool,
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            rotation: 0.0,
            fill: DEFAULT_FILL.to_string(),
            stroke: DEFAULT_STROKE.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            opacity: DEFAULT_OPACITY,
            shadow_color: DEFAULT_SHADOW_COLOR.to_string(),
            shadow_blur: 0.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_opacity: 0.0,
            draggable: DEFAULT_DRAGGABLE,
        }
    }
}

/// Partial update of the shape-owned fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub rotation: Option<f64>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub shadow_color: Option<String>,
    pub shadow_blur: Option<f64>,
    pub shadow_offset_x: Option<f64>,
    pub shadow_offset_y: Option<f64>,
    pub shadow_opacity: Option<f64>,
    pub draggable: Option<bool>,
}

impl PlacementPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleGeometry {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextGeometry {
    pub font_family: String,
    pub font_size: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaGeometry {
    pub width: f64,
    pub height: f64,
    /// Id of the `media_contents` row being placed.
    pub media_content: DbId,
}

/// Geometry of a new shape, one variant per registered kind.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    Rectangle(RectangleGeometry),
    Circle(CircleGeometry),
    Text(TextGeometry),
    Media(MediaGeometry),
}

impl GeometryInput {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Text(_) => ShapeKind::Text,
            Self::Media(_) => ShapeKind::Media,
        }
    }

    /// Build from an already validated snake_case field mapping.
    pub fn from_fields(kind: ShapeKind, fields: Map<String, Value>) -> Result<Self, CoreError> {
        let value = Value::Object(fields);
        let geometry = match kind {
            ShapeKind::Rectangle => Self::Rectangle(from_validated(value)?),
            ShapeKind::Circle => Self::Circle(from_validated(value)?),
            ShapeKind::Text => Self::Text(from_validated(value)?),
            ShapeKind::Media => Self::Media(from_validated(value)?),
        };
        Ok(geometry)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectanglePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirclePatch {
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPatch {
    pub font_family: Option<String>,
    pub font_size: Option<i32>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub media_content: Option<DbId>,
}

/// Partial update of a shape's geometry row.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPatch {
    Rectangle(RectanglePatch),
    Circle(CirclePatch),
    Text(TextPatch),
    Media(MediaPatch),
}

impl GeometryPatch {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Text(_) => ShapeKind::Text,
            Self::Media(_) => ShapeKind::Media,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rectangle(p) => *p == RectanglePatch::default(),
            Self::Circle(p) => *p == CirclePatch::default(),
            Self::Text(p) => *p == TextPatch::default(),
            Self::Media(p) => *p == MediaPatch::default(),
        }
    }

    /// The MediaContent a media patch re-points to, if any.
    pub fn media_content(&self) -> Option<DbId> {
        match self {
            Self::Media(p) => p.media_content,
            _ => None,
        }
    }

    /// Build from an already validated snake_case field mapping.
    pub fn from_fields(kind: ShapeKind, fields: Map<String, Value>) -> Result<Self, CoreError> {
        let value = Value::Object(fields);
        let patch = match kind {
            ShapeKind::Rectangle => Self::Rectangle(from_validated(value)?),
            ShapeKind::Circle => Self::Circle(from_validated(value)?),
            ShapeKind::Text => Self::Text(from_validated(value)?),
            ShapeKind::Media => Self::Media(from_validated(value)?),
        };
        Ok(patch)
    }
}

// ---------------------------------------------------------------------------
// Create / update inputs
// ---------------------------------------------------------------------------

/// A decoded, validated shape creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShape {
    pub geometry: GeometryInput,
    pub placement: PlacementInput,
}

impl NewShape {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// The MediaContent an image shape places, if any.
    pub fn media_content(&self) -> Option<DbId> {
        match &self.geometry {
            GeometryInput::Media(m) => Some(m.media_content),
            _ => None,
        }
    }
}

/// A decoded, validated partial shape update, already split into the
/// geometry-owned and shape-owned subsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeUpdate {
    pub geometry: GeometryPatch,
    pub placement: PlacementPatch,
}

/// Deserialize a mapping that has already passed field validation. A
/// failure here means the field tables and the typed structs disagree.
fn from_validated<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value)
        .map_err(|e| CoreError::Internal(format!("Validated fields failed to deserialize: {e}")))
}
