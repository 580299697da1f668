//! MediaContent model and DTO.

use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::FromRow;
use uptemplate_core::types::{DbId, Timestamp};

/// A row from the `media_contents` table: an uploaded file reference plus
/// its declared dimensions and alt text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaContent {
    pub id: DbId,
    pub owner_id: DbId,
    /// Reference returned by the blob store.
    pub content: String,
    pub original_width: i32,
    pub original_height: i32,
    pub alt: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaContent {
    /// Snake_case fields nested under `media_content` in an image shape's
    /// representation.
    pub fn nested_fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("content".into(), json!(self.content));
        map.insert("original_width".into(), json!(self.original_width));
        map.insert("original_height".into(), json!(self.original_height));
        map.insert("alt".into(), json!(self.alt));
        map.insert("user".into(), json!(self.owner_id));
        map
    }
}

/// DTO for inserting a MediaContent row after the blob has been stored.
#[derive(Debug, Clone)]
pub struct CreateMediaContent {
    pub content: String,
    pub original_width: i32,
    pub original_height: i32,
    pub alt: String,
}
