//! Geometry row models, one table per shape kind.
//!
//! Each geometry row is owned by exactly one shape, which references it by
//! `(kind, geometry_id)`. [`Geometry`] is the tagged union over the four
//! row types.

use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::FromRow;
use uptemplate_core::registry::ShapeKind;
use uptemplate_core::types::{DbId, Timestamp};

use super::media_content::MediaContent;

/// A row from the `rectangles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rectangle {
    pub id: DbId,
    pub width: f64,
    pub height: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `circles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Circle {
    pub id: DbId,
    pub radius: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `texts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Text {
    pub id: DbId,
    pub font_family: String,
    pub font_size: i32,
    pub text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub width: f64,
    pub height: f64,
    pub media_content_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The concrete geometry behind a shape.
#[derive(Debug, Clone)]
pub enum Geometry {
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
    /// A media placement together with the content it places.
    Media {
        media: Media,
        content: MediaContent,
    },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Text(_) => ShapeKind::Text,
            Self::Media { .. } => ShapeKind::Media,
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Self::Rectangle(r) => r.id,
            Self::Circle(c) => c.id,
            Self::Text(t) => t.id,
            Self::Media { media, .. } => media.id,
        }
    }

    /// Geometry-owned fields, keyed by the registry's snake_case names.
    ///
    /// For media, `media_content` carries the nested content fields rather
    /// than the bare foreign key.
    pub fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match self {
            Self::Rectangle(r) => {
                map.insert("width".into(), json!(r.width));
                map.insert("height".into(), json!(r.height));
            }
            Self::Circle(c) => {
                map.insert("radius".into(), json!(c.radius));
            }
            Self::Text(t) => {
                map.insert("font_family".into(), json!(t.font_family));
                map.insert("font_size".into(), json!(t.font_size));
                map.insert("text".into(), json!(t.text));
            }
            Self::Media { media, content } => {
                map.insert("width".into(), json!(media.width));
                map.insert("height".into(), json!(media.height));
                map.insert(
                    "media_content".into(),
                    Value::Object(content.nested_fields()),
                );
            }
        }
        map
    }
}
