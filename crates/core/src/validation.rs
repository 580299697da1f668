//! Field-level validation driven by static field tables.
//!
//! The registry and the shape placement module describe their fields as
//! [`FieldSpec`] tables; [`validate_fields`] checks a snake_case JSON
//! mapping against such a table and reports every violation it finds.

use serde::Serialize;
use serde_json::{Map, Value};

/// A single offending field in a request payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Value type (and range) accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    /// Any JSON number, optionally bounded (inclusive).
    Number { min: Option<f64>, max: Option<f64> },
    /// A JSON integer strictly greater than zero that fits an `i32`.
    PositiveInteger,
    /// A JSON string, optionally length-limited (in characters).
    Text { max_len: Option<usize> },
    Boolean,
    /// The id of another entity (a positive integer).
    Reference,
}

/// Declarative description of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Required on create. Updates never require anything.
    pub required: bool,
}

impl FieldSpec {
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number { min: None, max: None })
    }

    pub const fn non_negative(name: &'static str) -> Self {
        Self::new(
            name,
            FieldType::Number {
                min: Some(0.0),
                max: None,
            },
        )
    }

    pub const fn unit_interval(name: &'static str) -> Self {
        Self::new(
            name,
            FieldType::Number {
                min: Some(0.0),
                max: Some(1.0),
            },
        )
    }

    pub const fn text(name: &'static str, max_len: usize) -> Self {
        Self::new(
            name,
            FieldType::Text {
                max_len: Some(max_len),
            },
        )
    }

    /// A field that may be omitted; chain [`FieldSpec::required`] to make
    /// it mandatory on create.
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// Whether missing required fields are violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Create: every `required` field must be present.
    Create,
    /// Update: any subset of fields may be present.
    Partial,
}

/// Validate `data` against `specs`.
///
/// Keys of `data` that are not described by `specs` are ignored here; the
/// caller decides what an unknown key means. Violations are returned in
/// table order.
pub fn validate_fields(
    specs: &[FieldSpec],
    data: &Map<String, Value>,
    presence: Presence,
) -> Vec<FieldViolation> {
    specs
        .iter()
        .filter_map(|spec| match data.get(spec.name) {
            None if spec.required && presence == Presence::Create => {
                Some(FieldViolation::new(spec.name, "This field is required"))
            }
            None => None,
            Some(value) => check_value(spec, value),
        })
        .collect()
}

fn check_value(spec: &FieldSpec, value: &Value) -> Option<FieldViolation> {
    let message = match spec.field_type {
        FieldType::Number { min, max } => match value.as_f64() {
            None => Some("Must be a number".to_string()),
            Some(n) if !n.is_finite() => Some("Must be a finite number".to_string()),
            Some(n) => match (min, max) {
                (Some(lo), Some(hi)) if n < lo || n > hi => {
                    Some(format!("Must be between {lo} and {hi}"))
                }
                (Some(lo), _) if n < lo => Some(format!("Must be at least {lo}")),
                (_, Some(hi)) if n > hi => Some(format!("Must be at most {hi}")),
                _ => None,
            },
        },
        FieldType::PositiveInteger => match value.as_i64() {
            Some(n) if n > i64::from(i32::MAX) => Some(format!("Must be at most {}", i32::MAX)),
            Some(n) if n > 0 => None,
            Some(_) => Some("Must be greater than 0".to_string()),
            None => Some("Must be an integer".to_string()),
        },
        FieldType::Text { max_len } => match value.as_str() {
            None => Some("Must be a string".to_string()),
            Some(s) => match max_len {
                Some(max) if s.chars().count() > max => {
                    Some(format!("Must be at most {max} characters"))
                }
                _ => None,
            },
        },
        FieldType::Boolean => (!value.is_boolean()).then(|| "Must be a boolean".to_string()),
        FieldType::Reference => match value.as_i64() {
            Some(n) if n > 0 => None,
            _ => Some("Must be a valid id".to_string()),
        },
    };

    message.map(|m| FieldViolation::new(spec.name, m))
}
