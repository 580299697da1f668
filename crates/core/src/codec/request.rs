//! Inbound (write path) decoding of shape requests.
//!
//! Wire keys are renamed to snake_case, `shadowOffset: {x, y}` is expanded
//! into the two flat columns, and the mapping is partitioned into the
//! geometry-owned subset (per the registry) and the shape-owned subset.
//! Both subsets are validated before anything is returned, and every
//! offending field is reported at once.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::case::{camel_to_snake, snake_to_camel};
use super::{ID, SHADOW_OFFSET, SHADOW_OFFSET_X, SHADOW_OFFSET_Y};
use crate::error::CoreError;
use crate::registry::ShapeKind;
use crate::shape::{
    is_placement_field, GeometryInput, GeometryPatch, NewShape, PlacementInput, PlacementPatch,
    ShapeUpdate, PLACEMENT_FIELDS,
};
use crate::types::DbId;
use crate::validation::{validate_fields, FieldViolation, Presence};

/// Key carrying the kind on the wire.
const TYPE: &str = "type";

/// Body of a shape creation request.
///
/// `type` may be the kind name (`"Rect"`) or the wire type (`"v-rect"`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShapeRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A snake_case mapping split by owner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub geometry: Map<String, Value>,
    pub placement: Map<String, Value>,
    /// Keys owned by neither side.
    pub unknown: Map<String, Value>,
}

/// Split a snake_case mapping into geometry-owned, shape-owned and unknown
/// keys. Every input key lands in exactly one bucket.
pub fn partition_fields(kind: ShapeKind, fields: Map<String, Value>) -> Partition {
    let mut partition = Partition::default();
    for (key, value) in fields {
        let bucket = if kind.owns_field(&key) {
            &mut partition.geometry
        } else if is_placement_field(&key) {
            &mut partition.placement
        } else {
            &mut partition.unknown
        };
        bucket.insert(key, value);
    }
    partition
}

/// Decode and validate a creation request.
///
/// The kind is resolved first, so an unregistered kind fails with
/// [`CoreError::UnknownKind`] regardless of the config contents.
pub fn decode_create(request: &CreateShapeRequest) -> Result<NewShape, CoreError> {
    let kind = ShapeKind::parse(&request.kind)?;
    let (fields, mut violations) = to_persisted_keys(&request.config);
    let mut partition = partition_fields(kind, fields);

    if partition.unknown.remove(ID).is_some() {
        violations.push(FieldViolation::new(ID, "Read-only field"));
    }
    violations.extend(unknown_violations(&partition.unknown));
    violations.extend(validate_fields(
        kind.geometry_fields(),
        &partition.geometry,
        Presence::Create,
    ));
    violations.extend(validate_fields(
        PLACEMENT_FIELDS,
        &partition.placement,
        Presence::Partial,
    ));
    reject(violations)?;

    Ok(NewShape {
        geometry: GeometryInput::from_fields(kind, partition.geometry)?,
        placement: placement_from(partition.placement)?,
    })
}

/// Decode and validate a partial update of shape `shape_id` of kind `kind`.
///
/// `id` is tolerated only when it names the shape being updated and `type`
/// only when it resolves to the shape's current kind.
pub fn decode_update(
    kind: ShapeKind,
    shape_id: DbId,
    wire: &Map<String, Value>,
) -> Result<ShapeUpdate, CoreError> {
    let (fields, mut violations) = to_persisted_keys(wire);
    let mut partition = partition_fields(kind, fields);

    if let Some(id) = partition.unknown.remove(ID) {
        if id.as_i64() != Some(shape_id) {
            violations.push(FieldViolation::new(
                ID,
                "Does not match the shape being updated",
            ));
        }
    }
    if let Some(requested) = partition.unknown.remove(TYPE) {
        let same_kind = requested
            .as_str()
            .and_then(|s| ShapeKind::parse(s).ok())
            .is_some_and(|k| k == kind);
        if !same_kind {
            violations.push(FieldViolation::new(TYPE, "Shape kind cannot be changed"));
        }
    }
    violations.extend(unknown_violations(&partition.unknown));
    violations.extend(validate_fields(
        kind.geometry_fields(),
        &partition.geometry,
        Presence::Partial,
    ));
    violations.extend(validate_fields(
        PLACEMENT_FIELDS,
        &partition.placement,
        Presence::Partial,
    ));
    reject(violations)?;

    Ok(ShapeUpdate {
        geometry: GeometryPatch::from_fields(kind, partition.geometry)?,
        placement: from_validated_patch(partition.placement)?,
    })
}

/// Rename wire keys to snake_case and expand `shadowOffset`.
///
/// Violations use snake_case names; [`reject`] converts them back.
fn to_persisted_keys(wire: &Map<String, Value>) -> (Map<String, Value>, Vec<FieldViolation>) {
    let mut fields = Map::new();
    let mut violations = Vec::new();

    for (key, value) in wire {
        let snake = camel_to_snake(key);
        if fields.insert(snake.clone(), value.clone()).is_some() {
            violations.push(FieldViolation::new(snake, "Field given more than once"));
        }
    }

    if let Some(offset) = fields.remove(SHADOW_OFFSET) {
        if fields.contains_key(SHADOW_OFFSET_X) || fields.contains_key(SHADOW_OFFSET_Y) {
            violations.push(FieldViolation::new(
                SHADOW_OFFSET,
                "Give either shadowOffset or shadowOffsetX/shadowOffsetY, not both",
            ));
        } else {
            match offset {
                Value::Object(mut xy) => {
                    for (axis, column) in [("x", SHADOW_OFFSET_X), ("y", SHADOW_OFFSET_Y)] {
                        if let Some(v) = xy.remove(axis) {
                            fields.insert(column.to_string(), v);
                        }
                    }
                    for extra in xy.keys() {
                        violations.push(FieldViolation::new(
                            format!("{SHADOW_OFFSET}.{extra}"),
                            "Unknown field",
                        ));
                    }
                }
                _ => violations.push(FieldViolation::new(
                    SHADOW_OFFSET,
                    "Must be an object with x and y",
                )),
            }
        }
    }

    (fields, violations)
}

fn unknown_violations(unknown: &Map<String, Value>) -> Vec<FieldViolation> {
    unknown
        .keys()
        .map(|key| FieldViolation::new(key.as_str(), "Unknown field"))
        .collect()
}

/// Fail with every violation, field names rendered the way the client
/// sent them (camelCase).
fn reject(violations: Vec<FieldViolation>) -> Result<(), CoreError> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(CoreError::InvalidFields(
        violations
            .into_iter()
            .map(|v| FieldViolation {
                field: snake_to_camel(&v.field),
                message: v.message,
            })
            .collect(),
    ))
}

fn placement_from(fields: Map<String, Value>) -> Result<PlacementInput, CoreError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| CoreError::Internal(format!("Validated placement failed to deserialize: {e}")))
}

fn from_validated_patch(fields: Map<String, Value>) -> Result<PlacementPatch, CoreError> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| CoreError::Internal(format!("Validated patch failed to deserialize: {e}")))
}
