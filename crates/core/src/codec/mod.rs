//! Representation codec.
//!
//! Persisted rows are flat snake_case mappings: the shape's own transform,
//! style and shadow columns plus the columns of its geometry row. The wire
//! representation wraps those fields as `{ "type": <wire type>, "config": {...} }`
//! with camelCase keys and `shadow_offset_x`/`shadow_offset_y` nested as
//! `shadowOffset: { x, y }`.
//!
//! - [`case`]: key renaming in both directions.
//! - [`representation`]: outbound (read path).
//! - [`request`]: inbound (write path), producing validated
//!   [`NewShape`](crate::shape::NewShape) / [`ShapeUpdate`](crate::shape::ShapeUpdate).

pub mod case;
pub mod representation;
pub mod request;

pub use case::{camel_to_snake, snake_to_camel};
pub use representation::{encode_shape, ShapeRepresentation};
pub use request::{decode_create, decode_update, partition_fields, CreateShapeRequest, Partition};

/// Flattened shadow offset keys and the composite key they collapse into.
pub const SHADOW_OFFSET: &str = "shadow_offset";
pub const SHADOW_OFFSET_X: &str = "shadow_offset_x";
pub const SHADOW_OFFSET_Y: &str = "shadow_offset_y";

/// The one key that is never renamed and never dropped from `config`.
pub const ID: &str = "id";
