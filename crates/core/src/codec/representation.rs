//! Outbound (read path) encoding of a shape.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::case::{rename_keys, snake_to_camel};
use super::{ID, SHADOW_OFFSET, SHADOW_OFFSET_X, SHADOW_OFFSET_Y};
use crate::error::CoreError;
use crate::registry::ShapeKind;
use crate::types::DbId;

/// Columns of the shape and geometry rows that never reach the wire.
const INTERNAL_FIELDS: &[&str] = &[
    "layout_id",
    "kind",
    "geometry_id",
    "created_at",
    "updated_at",
];

/// Wire representation of one shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRepresentation {
    pub id: DbId,
    #[serde(rename = "type")]
    pub shape_type: &'static str,
    pub config: Map<String, Value>,
}

/// Assemble the outward representation of a shape.
///
/// `placement` holds the shape row's columns and `geometry` the geometry
/// row's columns, both snake_case. The geometry row's own `id`, parent
/// foreign keys and timestamps are dropped; the shape's `id` is kept.
pub fn encode_shape(
    kind: ShapeKind,
    id: DbId,
    placement: Map<String, Value>,
    geometry: Map<String, Value>,
) -> Result<ShapeRepresentation, CoreError> {
    let mut flat: Map<String, Value> = placement
        .into_iter()
        .filter(|(key, _)| !is_internal(key))
        .collect();

    for (key, value) in geometry {
        if key == ID || is_internal(&key) {
            continue;
        }
        if flat.insert(key.clone(), value).is_some() {
            return Err(CoreError::Internal(format!(
                "{kind} geometry field '{key}' collides with a shape field"
            )));
        }
    }

    nest_shadow_offset(&mut flat)?;
    flat.insert(ID.to_string(), json!(id));

    Ok(ShapeRepresentation {
        id,
        shape_type: kind.wire_type(),
        config: rename_keys(flat, snake_to_camel),
    })
}

/// Collapse `shadow_offset_x`/`shadow_offset_y` into `shadow_offset: {x, y}`.
pub fn nest_shadow_offset(map: &mut Map<String, Value>) -> Result<(), CoreError> {
    let x = map.remove(SHADOW_OFFSET_X);
    let y = map.remove(SHADOW_OFFSET_Y);
    match (x, y) {
        (Some(x), Some(y)) => {
            map.insert(SHADOW_OFFSET.to_string(), json!({ "x": x, "y": y }));
            Ok(())
        }
        _ => Err(CoreError::Internal(
            "Shape row is missing its shadow offset columns".into(),
        )),
    }
}

fn is_internal(key: &str) -> bool {
    INTERNAL_FIELDS.contains(&key)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::shape::PlacementInput;

    fn placement_row(overrides: Value) -> Map<String, Value> {
        let mut map = serde_json::to_value(PlacementInput::default())
            .unwrap()
            .as_object()
            .cloned()
            .unwrap();
        map.insert("layout_id".into(), json!(3));
        map.insert("kind".into(), json!(1));
        map.insert("geometry_id".into(), json!(11));
        map.insert("created_at".into(), json!("2024-01-01T00:00:00Z"));
        map.insert("updated_at".into(), json!("2024-01-01T00:00:00Z"));
        for (k, v) in overrides.as_object().cloned().unwrap() {
            map.insert(k, v);
        }
        map
    }

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn rectangle_scenario() {
        let repr = encode_shape(
            ShapeKind::Rectangle,
            7,
            placement_row(json!({ "x": 1.0, "y": 30.0 })),
            obj(json!({ "id": 11, "width": 1000.0, "height": 2000.0 })),
        )
        .unwrap();

        assert_eq!(repr.id, 7);
        assert_eq!(repr.shape_type, "v-rect");
        let expected = json!({
            "id": 7,
            "x": 1.0, "y": 30.0,
            "offsetX": 0.0, "offsetY": 0.0,
            "scaleX": 1.0, "scaleY": 1.0,
            "rotation": 0.0,
            "width": 1000.0, "height": 2000.0,
            "fill": "white", "stroke": "black", "strokeWidth": 1.0,
            "opacity": 1.0,
            "shadowColor": "black", "shadowBlur": 0.0,
            "shadowOffset": { "x": 0.0, "y": 0.0 },
            "shadowOpacity": 0.0,
            "draggable": true,
        });
        assert_eq!(Value::Object(repr.config), expected);
    }

    #[test]
    fn internal_fields_and_geometry_id_are_dropped() {
        let repr = encode_shape(
            ShapeKind::Circle,
            2,
            placement_row(json!({})),
            obj(json!({ "id": 99, "radius": 5.0, "created_at": "x" })),
        )
        .unwrap();
        for key in ["layoutId", "kind", "geometryId", "createdAt", "updatedAt"] {
            assert!(!repr.config.contains_key(key), "{key} leaked");
        }
        assert_eq!(repr.config["id"], 2);
        assert_eq!(repr.config["radius"], 5.0);
    }

    #[test]
    fn shadow_offset_is_nested() {
        let repr = encode_shape(
            ShapeKind::Circle,
            1,
            placement_row(json!({ "shadow_offset_x": 5.0, "shadow_offset_y": -2.0 })),
            obj(json!({ "radius": 1.0 })),
        )
        .unwrap();
        assert_eq!(repr.config["shadowOffset"], json!({ "x": 5.0, "y": -2.0 }));
        assert!(!repr.config.contains_key("shadowOffsetX"));
        assert!(!repr.config.contains_key("shadowOffsetY"));
    }

    #[test]
    fn nested_media_content_keys_are_camel_cased() {
        let repr = encode_shape(
            ShapeKind::Media,
            4,
            placement_row(json!({})),
            obj(json!({
                "id": 8,
                "width": 10.0,
                "height": 20.0,
                "media_content": {
                    "id": 5,
                    "content": "/media/a.png",
                    "original_width": 100,
                    "original_height": 100,
                    "alt": "Image Description",
                    "user": 1,
                },
            })),
        )
        .unwrap();
        assert_eq!(repr.shape_type, "v-image");
        assert_eq!(repr.config["mediaContent"]["originalWidth"], 100);
        assert_eq!(repr.config["mediaContent"]["id"], 5);
    }

    #[test]
    fn key_collision_is_an_internal_error() {
        let result = encode_shape(
            ShapeKind::Rectangle,
            1,
            placement_row(json!({})),
            obj(json!({ "width": 1.0, "fill": "red" })),
        );
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[test]
    fn missing_shadow_offset_column_is_an_internal_error() {
        let mut row = placement_row(json!({}));
        row.remove("shadow_offset_y");
        let result = encode_shape(ShapeKind::Circle, 1, row, obj(json!({ "radius": 1.0 })));
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[test]
    fn serializes_type_key() {
        let repr = encode_shape(
            ShapeKind::Text,
            3,
            placement_row(json!({})),
            obj(json!({ "font_family": "Arial", "font_size": 12, "text": "hi" })),
        )
        .unwrap();
        let json = serde_json::to_value(&repr).unwrap();
        assert_eq!(json["type"], "v-text");
        assert_eq!(json["id"], 3);
        assert_eq!(json["config"]["fontFamily"], "Arial");
        assert_eq!(json["config"]["fontSize"], 12);
    }
}
