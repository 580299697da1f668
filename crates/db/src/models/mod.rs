//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where
//!   the entity is updatable

pub mod geometry;
pub mod layout;
pub mod media_content;
pub mod shape;
pub mod template;
