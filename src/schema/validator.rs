//! Constraint validation and default resolution
//!
//! Validation semantics:
//! - Absence is handled first: the auto factory synthesizes a seed value
//!   (type-checked only), a missing required value fails, and an optional
//!   unset value resolves to `NotSet`.
//! - Supplied values dispatch on the declared type: text length/pattern,
//!   numeric range (both sides must hold when both are present), boolean,
//!   version-4 UUID, datetime as a Unix millisecond timestamp.
//! - The validator never mutates the descriptor and has no side effects.

use chrono::DateTime;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use super::errors::{SchemaError, SchemaResult};
use super::types::{auto_generate, Factory, FieldDescriptor, FieldType};

/// Outcome of resolving a candidate value against a field descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No value, and none is required
    NotSet,
    /// The validated (possibly normalized) value
    Value(Value),
}

impl Resolution {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Resolution::NotSet => None,
            Resolution::Value(v) => Some(v),
        }
    }
}

/// Validate a candidate value against a field descriptor.
///
/// Absent candidates run through default resolution; present candidates
/// run through the per-type dispatch. Errors carry the field's name and
/// the resolved constraint.
pub fn resolve_value(field: &FieldDescriptor, candidate: Option<Value>) -> SchemaResult<Resolution> {
    let value = match candidate {
        None => return resolve_absent(field),
        Some(value) => value,
    };

    match field.field_type {
        FieldType::Text => validate_text(field, value),
        FieldType::Integer => validate_integer(field, value),
        FieldType::Float => validate_float(field, value),
        FieldType::Boolean => validate_boolean(field, value),
        FieldType::Uuid => validate_uuid(field, value),
        FieldType::Datetime => validate_datetime(field, value),
        FieldType::Json | FieldType::List => Err(SchemaError::unsupported_type(
            &field.name,
            field.field_type.type_name(),
        )),
    }
}

/// Default resolution for an absent candidate.
///
/// Generated values are type-checked but not constraint-checked: the seed
/// is a starting value, not operator data.
fn resolve_absent(field: &FieldDescriptor) -> SchemaResult<Resolution> {
    match field.factory {
        Factory::Auto => {
            let generated = auto_generate(field.field_type).ok_or_else(|| {
                SchemaError::unsupported_type(&field.name, field.field_type.type_name())
            })?;
            if !type_agrees(field.field_type, &generated) {
                return Err(SchemaError::type_mismatch(
                    &field.name,
                    field.field_type.type_name(),
                    json_type_name(&generated),
                ));
            }
            Ok(Resolution::Value(generated))
        }
        Factory::Manual if field.required => Err(SchemaError::missing_required(&field.name)),
        Factory::Manual => Ok(Resolution::NotSet),
    }
}

fn validate_text(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    let text = value
        .as_str()
        .ok_or_else(|| type_error(field, "text", &value))?;

    let length = text.chars().count();
    if let Some(min) = field.min_length {
        if length < min {
            return Err(SchemaError::constraint_violation(
                &field.name,
                format!("length >= {}", min),
                format!("length {}", length),
            ));
        }
    }
    if let Some(max) = field.max_length {
        if length > max {
            return Err(SchemaError::constraint_violation(
                &field.name,
                format!("length <= {}", max),
                format!("length {}", length),
            ));
        }
    }

    if let Some(pattern) = &field.pattern {
        let anchored = compile_anchored(&field.name, pattern)?;
        if !anchored.is_match(text) {
            return Err(SchemaError::constraint_violation(
                &field.name,
                format!("full match for pattern {}", pattern),
                text,
            ));
        }
    }

    Ok(Resolution::Value(value))
}

fn validate_integer(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    let number = value
        .as_i64()
        .ok_or_else(|| type_error(field, "integer", &value))?;
    check_range(field, number as f64, &number.to_string())?;
    Ok(Resolution::Value(value))
}

fn validate_float(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    // Integer candidates are acceptable floats.
    let number = value
        .as_f64()
        .ok_or_else(|| type_error(field, "float", &value))?;
    check_range(field, number, &number.to_string())?;
    Ok(Resolution::Value(value))
}

fn validate_boolean(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    if !value.is_boolean() {
        return Err(type_error(field, "boolean", &value));
    }
    Ok(Resolution::Value(value))
}

fn validate_uuid(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    let text = value
        .as_str()
        .ok_or_else(|| type_error(field, "uuid", &value))?;
    let parsed = Uuid::parse_str(text).map_err(|_| {
        SchemaError::invalid_format(&field.name, "a version-4 UUID", text)
    })?;
    if parsed.get_version_num() != 4 {
        return Err(SchemaError::invalid_format(
            &field.name,
            "a version-4 UUID",
            format!("a version-{} UUID", parsed.get_version_num()),
        ));
    }
    Ok(Resolution::Value(value))
}

/// Datetime candidates are Unix millisecond timestamps. RFC 3339 strings
/// are accepted and normalized to the millisecond form; the resolved
/// numeric bounds always apply to the millisecond value.
fn validate_datetime(field: &FieldDescriptor, value: Value) -> SchemaResult<Resolution> {
    let millis = match &value {
        Value::Number(_) => {
            let millis = value
                .as_i64()
                .ok_or_else(|| type_error(field, "datetime", &value))?;
            if DateTime::from_timestamp_millis(millis).is_none() {
                return Err(SchemaError::invalid_format(
                    &field.name,
                    "a Unix millisecond timestamp",
                    millis.to_string(),
                ));
            }
            millis
        }
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.timestamp_millis())
            .map_err(|_| {
                SchemaError::invalid_format(&field.name, "an RFC 3339 datetime", text.as_str())
            })?,
        _ => return Err(type_error(field, "datetime", &value)),
    };

    check_range(field, millis as f64, &millis.to_string())?;
    Ok(Resolution::Value(Value::from(millis)))
}

/// Apply the resolved range; both sides must hold when both are present.
fn check_range(field: &FieldDescriptor, candidate: f64, shown: &str) -> SchemaResult<()> {
    let range = field.resolved_range();
    if range.is_unconstrained() {
        return Ok(());
    }
    if !range.contains(candidate) {
        return Err(SchemaError::constraint_violation(
            &field.name,
            format!("value within {}", range),
            shown,
        ));
    }
    Ok(())
}

/// Whether a JSON value agrees with the declared type (used for generated
/// seed values, which skip constraint checks)
fn type_agrees(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Float => value.is_number(),
        FieldType::Text => value.is_string(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Datetime => value.is_i64(),
        FieldType::Uuid => value.is_string(),
        FieldType::Json => value.is_object(),
        FieldType::List => value.is_array(),
    }
}

/// Compile an anchored (full-match) regex for a declared pattern
fn compile_anchored(field_name: &str, pattern: &str) -> SchemaResult<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|_| {
        SchemaError::invalid_format(field_name, "a valid regular expression", pattern)
    })
}

/// Returns the JSON type name for error messages
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(field: &FieldDescriptor, expected: &str, actual: &Value) -> SchemaError {
    SchemaError::type_mismatch(&field.name, expected, json_type_name(actual))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use serde_json::json;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            field_type,
            alias: None,
            factory: Factory::Manual,
            required: false,
            unique: false,
            pattern: None,
            min_length: None,
            max_length: None,
            gt: None,
            ge: None,
            lt: None,
            le: None,
            decimal_places: 2,
            default_value: None,
        }
    }

    #[test]
    fn test_optional_unset_resolves_to_not_set() {
        let f = field("note", FieldType::Text);
        assert_eq!(resolve_value(&f, None).unwrap(), Resolution::NotSet);
    }

    #[test]
    fn test_required_unset_fails() {
        let mut f = field("note", FieldType::Text);
        f.required = true;
        let err = resolve_value(&f, None).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredValue);
        assert_eq!(err.attribute(), "note");
    }

    #[test]
    fn test_auto_factory_generates_uuid() {
        let mut f = field("token", FieldType::Uuid);
        f.factory = Factory::Auto;
        let resolved = resolve_value(&f, None).unwrap();
        let value = resolved.into_value().unwrap();
        let parsed = Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_auto_factory_unsupported_tag_fails() {
        let mut f = field("payload", FieldType::Json);
        f.factory = Factory::Auto;
        let err = resolve_value(&f, None).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
    }

    #[test]
    fn test_auto_factory_ignores_bounds() {
        // The seed is type-checked only; bounds that exclude it do not fail.
        let mut f = field("count", FieldType::Integer);
        f.factory = Factory::Auto;
        f.ge = Some(10.0);
        let resolved = resolve_value(&f, None).unwrap();
        assert_eq!(resolved, Resolution::Value(json!(0)));
    }

    #[test]
    fn test_text_length_edges() {
        let mut f = field("code", FieldType::Text);
        f.min_length = Some(2);
        f.max_length = Some(4);

        assert!(resolve_value(&f, Some(json!("ab"))).is_ok());
        assert!(resolve_value(&f, Some(json!("abcd"))).is_ok());

        let err = resolve_value(&f, Some(json!("a"))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ConstraintViolation);
        assert!(err.details().unwrap().expected.contains("length >= 2"));

        let err = resolve_value(&f, Some(json!("abcde"))).unwrap_err();
        assert!(err.details().unwrap().expected.contains("length <= 4"));
    }

    #[test]
    fn test_text_pattern_is_anchored() {
        let mut f = field("code", FieldType::Text);
        f.pattern = Some("[a-z]+".into());

        assert!(resolve_value(&f, Some(json!("abc"))).is_ok());
        // A partial match is not a full match.
        assert!(resolve_value(&f, Some(json!("abc1"))).is_err());
        assert!(resolve_value(&f, Some(json!("1abc"))).is_err());
    }

    #[test]
    fn test_text_rejects_non_string() {
        let f = field("code", FieldType::Text);
        let err = resolve_value(&f, Some(json!(42))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
        assert_eq!(err.details().unwrap().actual, "integer");
    }

    #[test]
    fn test_integer_range_lower_bound_from_ge() {
        // ge=5 next to gt=3: effective lower bound is 5 inclusive.
        let mut f = field("count", FieldType::Integer);
        f.ge = Some(5.0);
        f.gt = Some(3.0);

        assert!(resolve_value(&f, Some(json!(5))).is_ok());
        let err = resolve_value(&f, Some(json!(4))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ConstraintViolation);
        assert!(err.details().unwrap().expected.contains(">= 5"));
    }

    #[test]
    fn test_float_equal_upper_declarations_exclusive() {
        // le=10 next to lt=10 resolves to < 10.
        let mut f = field("score", FieldType::Float);
        f.le = Some(10.0);
        f.lt = Some(10.0);

        assert!(resolve_value(&f, Some(json!(9.999))).is_ok());
        let err = resolve_value(&f, Some(json!(10.0))).unwrap_err();
        assert!(err.details().unwrap().expected.contains("< 10"));
    }

    #[test]
    fn test_both_sides_must_hold() {
        let mut f = field("score", FieldType::Float);
        f.ge = Some(3.0);
        f.le = Some(10.0);

        assert!(resolve_value(&f, Some(json!(3.0))).is_ok());
        assert!(resolve_value(&f, Some(json!(10.0))).is_ok());
        assert!(resolve_value(&f, Some(json!(2.9))).is_err());
        assert!(resolve_value(&f, Some(json!(10.1))).is_err());
    }

    #[test]
    fn test_float_accepts_integer_candidates() {
        let f = field("score", FieldType::Float);
        assert!(resolve_value(&f, Some(json!(7))).is_ok());
    }

    #[test]
    fn test_integer_rejects_float_candidates() {
        let f = field("count", FieldType::Integer);
        let err = resolve_value(&f, Some(json!(1.5))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
    }

    #[test]
    fn test_boolean_exact() {
        let f = field("active", FieldType::Boolean);
        assert!(resolve_value(&f, Some(json!(true))).is_ok());
        assert!(resolve_value(&f, Some(json!(false))).is_ok());
        assert!(resolve_value(&f, Some(json!("true"))).is_err());
        assert!(resolve_value(&f, Some(json!(1))).is_err());
    }

    #[test]
    fn test_uuid_v4_accepted() {
        let f = field("token", FieldType::Uuid);
        let value = json!(Uuid::new_v4().to_string());
        assert!(resolve_value(&f, Some(value)).is_ok());
    }

    #[test]
    fn test_uuid_garbage_rejected() {
        let f = field("token", FieldType::Uuid);
        let err = resolve_value(&f, Some(json!("not-a-uuid"))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidFormat);
    }

    #[test]
    fn test_uuid_wrong_version_rejected() {
        let f = field("token", FieldType::Uuid);
        // A NIL UUID parses but is not version 4.
        let err =
            resolve_value(&f, Some(json!("00000000-0000-0000-0000-000000000000"))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidFormat);
    }

    #[test]
    fn test_datetime_millis_accepted() {
        let f = field("created_at", FieldType::Datetime);
        let resolved = resolve_value(&f, Some(json!(1700000000000i64))).unwrap();
        assert_eq!(resolved, Resolution::Value(json!(1700000000000i64)));
    }

    #[test]
    fn test_datetime_out_of_range_rejected() {
        let f = field("created_at", FieldType::Datetime);
        let err = resolve_value(&f, Some(json!(i64::MAX))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidFormat);
    }

    #[test]
    fn test_datetime_rfc3339_normalized_to_millis() {
        let f = field("created_at", FieldType::Datetime);
        let resolved = resolve_value(&f, Some(json!("2023-11-14T22:13:20Z"))).unwrap();
        assert_eq!(resolved, Resolution::Value(json!(1700000000000i64)));
    }

    #[test]
    fn test_datetime_bounds_apply_to_millis() {
        let mut f = field("created_at", FieldType::Datetime);
        f.ge = Some(1700000000000.0);
        assert!(resolve_value(&f, Some(json!(1700000000000i64))).is_ok());
        assert!(resolve_value(&f, Some(json!(1699999999999i64))).is_err());
    }

    #[test]
    fn test_json_and_list_values_unsupported() {
        let f = field("payload", FieldType::Json);
        let err = resolve_value(&f, Some(json!({"a": 1}))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);

        let f = field("items", FieldType::List);
        let err = resolve_value(&f, Some(json!([1, 2]))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
    }

    #[test]
    fn test_bad_pattern_surfaces_as_invalid_format() {
        let mut f = field("code", FieldType::Text);
        f.pattern = Some("([unclosed".into());
        let err = resolve_value(&f, Some(json!("abc"))).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidFormat);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut f = field("score", FieldType::Float);
        f.ge = Some(0.0);
        f.lt = Some(100.0);
        for _ in 0..100 {
            assert!(resolve_value(&f, Some(json!(50.0))).is_ok());
            assert!(resolve_value(&f, Some(json!(100.0))).is_err());
        }
    }
}
