use crate::types::{DbId, KindTag};
use crate::validation::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A shape kind name, wire type or tag that the registry does not know.
    #[error("Unknown shape kind: {0}")]
    UnknownKind(String),

    /// One entry per offending field; never truncated to the first failure.
    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    /// A shape whose (kind, geometry_id) pair does not resolve to a geometry row.
    #[error("Shape geometry reference is dangling: kind {kind}, geometry id {geometry_id}")]
    ReferentialIntegrity { kind: KindTag, geometry_id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Convenience constructor for a single-field validation failure.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidFields(vec![FieldViolation::new(field, message)])
    }
}
