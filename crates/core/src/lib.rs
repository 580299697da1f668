//! Domain core for the template editor backend.
//!
//! Everything here is pure logic with no database access: identifiers,
//! the shape kind registry, the wire representation codec, input types
//! with their defaults and validation, and the blob store seam.

pub mod blob;
pub mod codec;
pub mod error;
pub mod media;
pub mod registry;
pub mod shape;
pub mod template;
pub mod types;
pub mod validation;
