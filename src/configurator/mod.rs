//! Descriptor builders
//!
//! Builders accumulate attribute values through an explicit unset state,
//! then finalize by validating every constraint at once. Finalization
//! yields the immutable descriptor or one validation error per offending
//! attribute, so the interactive layer can target its re-prompts.

pub mod attr;
pub mod datasource;
pub mod field;
pub mod metadata;
pub mod table;

pub use attr::Attr;
pub use datasource::DataSourceBuilder;
pub use field::FieldBuilder;
pub use metadata::{lookup, AttributeMeta, FIELD_ATTRIBUTES, SOURCE_ATTRIBUTES, TABLE_ATTRIBUTES};
pub use table::TableBuilder;

use serde_json::Value;

use crate::schema::{SchemaError, SchemaResult};

/// Identifier shape shared by names, aliases and user names
pub const IDENTIFIER_PATTERN: &str = "^[A-Za-z][A-Za-z0-9_]*$";

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check identifier shape and length; `None` when the value passes
pub(crate) fn identifier_error(
    attribute: &str,
    value: &str,
    min_length: usize,
    max_length: usize,
) -> Option<SchemaError> {
    if let Some(err) = length_error(attribute, value, min_length, max_length) {
        return Some(err);
    }
    if !is_identifier(value) {
        return Some(SchemaError::constraint_violation(
            attribute,
            format!("an identifier matching {}", IDENTIFIER_PATTERN),
            value,
        ));
    }
    None
}

/// Check character-count bounds; `None` when the value passes
pub(crate) fn length_error(
    attribute: &str,
    value: &str,
    min_length: usize,
    max_length: usize,
) -> Option<SchemaError> {
    let length = value.chars().count();
    if length < min_length || length > max_length {
        return Some(SchemaError::constraint_violation(
            attribute,
            format!("length within [{}, {}]", min_length, max_length),
            format!("length {}", length),
        ));
    }
    None
}

/// Coerce a boolean-ish JSON value.
///
/// Accepts true/false, 0/1, and "true"/"false" (case-insensitive).
/// Anything else is rejected rather than silently treated as false.
pub fn parse_boolean(attribute: &str, value: &Value) -> SchemaResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(SchemaError::constraint_violation(
                attribute,
                "one of 0/1",
                n.to_string(),
            )),
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(SchemaError::constraint_violation(
                attribute,
                "one of true/false",
                s.as_str(),
            )),
        },
        other => Err(SchemaError::type_mismatch(
            attribute,
            "boolean",
            match other {
                Value::Null => "null",
                Value::Array(_) => "array",
                Value::Object(_) => "object",
                _ => "value",
            },
        )),
    }
}
