//! Shape kind registry.
//!
//! The single source of truth mapping a shape kind to its numeric tag
//! (persisted in `shapes.kind`), its human-facing kind name, its wire type
//! name, its geometry table and the geometry-owned field list that drives
//! validation and the representation codec.
//!
//! | Kind      | Tag | Name     | Wire type  | Table        |
//! |-----------|-----|----------|------------|--------------|
//! | Rectangle | 1   | `Rect`   | `v-rect`   | `rectangles` |
//! | Circle    | 2   | `Circle` | `v-circle` | `circles`    |
//! | Text      | 3   | `Text`   | `v-text`   | `texts`      |
//! | Media     | 4   | `Image`  | `v-image`  | `media`      |

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::CoreError;
use crate::types::KindTag;
use crate::validation::{FieldSpec, FieldType};

// ---------------------------------------------------------------------------
// Geometry field tables
// ---------------------------------------------------------------------------

const RECTANGLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::non_negative("width").required(),
    FieldSpec::non_negative("height").required(),
];

const CIRCLE_FIELDS: &[FieldSpec] = &[FieldSpec::non_negative("radius").required()];

const TEXT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("font_family", 32).required(),
    FieldSpec::new("font_size", FieldType::PositiveInteger).required(),
    FieldSpec::new("text", FieldType::Text { max_len: None }).required(),
];

const MEDIA_FIELDS: &[FieldSpec] = &[
    FieldSpec::non_negative("width").required(),
    FieldSpec::non_negative("height").required(),
    FieldSpec::new("media_content", FieldType::Reference).required(),
];

// ---------------------------------------------------------------------------
// Registry entries
// ---------------------------------------------------------------------------

/// One row of the registry.
#[derive(Debug)]
pub struct KindEntry {
    pub kind: ShapeKind,
    pub name: &'static str,
    pub wire_type: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
}

const RECTANGLE: KindEntry = KindEntry {
    kind: ShapeKind::Rectangle,
    name: "Rect",
    wire_type: "v-rect",
    table: "rectangles",
    fields: RECTANGLE_FIELDS,
};

const CIRCLE: KindEntry = KindEntry {
    kind: ShapeKind::Circle,
    name: "Circle",
    wire_type: "v-circle",
    table: "circles",
    fields: CIRCLE_FIELDS,
};

const TEXT: KindEntry = KindEntry {
    kind: ShapeKind::Text,
    name: "Text",
    wire_type: "v-text",
    table: "texts",
    fields: TEXT_FIELDS,
};

const MEDIA: KindEntry = KindEntry {
    kind: ShapeKind::Media,
    name: "Image",
    wire_type: "v-image",
    table: "media",
    fields: MEDIA_FIELDS,
};

/// Every registered kind, in tag order.
pub const REGISTRY: [&KindEntry; 4] = [&RECTANGLE, &CIRCLE, &TEXT, &MEDIA];

// ---------------------------------------------------------------------------
// ShapeKind
// ---------------------------------------------------------------------------

/// Geometry variant of a shape. The discriminant is the persisted tag and
/// matches the seed order of the `shape_kinds` lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle = 1,
    Circle = 2,
    Text = 3,
    Media = 4,
}

impl ShapeKind {
    pub fn entry(self) -> &'static KindEntry {
        match self {
            Self::Rectangle => &RECTANGLE,
            Self::Circle => &CIRCLE,
            Self::Text => &TEXT,
            Self::Media => &MEDIA,
        }
    }

    /// Database tag value.
    pub fn tag(self) -> KindTag {
        self as KindTag
    }

    /// Human-facing kind name (`"Rect"`, `"Circle"`, `"Text"`, `"Image"`).
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Wire type name used in the outward representation.
    pub fn wire_type(self) -> &'static str {
        self.entry().wire_type
    }

    pub fn geometry_table(self) -> &'static str {
        self.entry().table
    }

    pub fn geometry_fields(self) -> &'static [FieldSpec] {
        self.entry().fields
    }

    /// Whether `field` (snake_case) is stored on this kind's geometry row.
    pub fn owns_field(self, field: &str) -> bool {
        self.geometry_fields().iter().any(|f| f.name == field)
    }

    /// Resolve a persisted tag.
    pub fn from_tag(tag: KindTag) -> Result<Self, CoreError> {
        REGISTRY
            .iter()
            .find(|e| e.kind.tag() == tag)
            .map(|e| e.kind)
            .ok_or_else(|| CoreError::UnknownKind(tag.to_string()))
    }

    /// Resolve a kind name (`"Rect"`).
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        REGISTRY
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.kind)
            .ok_or_else(|| CoreError::UnknownKind(name.to_string()))
    }

    /// Resolve a wire type name (`"v-rect"`).
    pub fn from_wire_type(wire_type: &str) -> Result<Self, CoreError> {
        REGISTRY
            .iter()
            .find(|e| e.wire_type == wire_type)
            .map(|e| e.kind)
            .ok_or_else(|| CoreError::UnknownKind(wire_type.to_string()))
    }

    /// Resolve client input, which may carry either the kind name or the
    /// wire type.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        Self::from_name(input).or_else(|_| Self::from_wire_type(input))
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ShapeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_type())
    }
}

// ---------------------------------------------------------------------------
// Registry contract
// ---------------------------------------------------------------------------

/// Resolve a tag to its kind name and geometry field list.
pub fn resolve_tag(tag: KindTag) -> Result<(&'static str, &'static [FieldSpec]), CoreError> {
    let kind = ShapeKind::from_tag(tag)?;
    Ok((kind.name(), kind.geometry_fields()))
}

/// Resolve a kind name to its tag.
pub fn resolve_name(name: &str) -> Result<KindTag, CoreError> {
    ShapeKind::from_name(name).map(ShapeKind::tag)
}
