//! Field descriptor builder

use serde_json::Value;

use crate::schema::{
    resolve_value, Factory, FieldDescriptor, FieldType, SchemaError, ValidationErrors,
};

use super::attr::Attr;
use super::identifier_error;

/// Accumulates field attributes, finalized into a `FieldDescriptor`.
///
/// Enumerated attributes (`type`, `factory`) are held as raw tags and
/// resolved at finalize time so that tag errors surface with their choice
/// sets like every other attribute error.
#[derive(Debug, Clone, Default)]
pub struct FieldBuilder {
    name: Attr<String>,
    field_type: Attr<String>,
    alias: Attr<String>,
    factory: Attr<String>,
    required: Attr<bool>,
    unique: Attr<bool>,
    pattern: Attr<String>,
    min_length: Attr<usize>,
    max_length: Attr<usize>,
    gt: Attr<f64>,
    ge: Attr<f64>,
    lt: Attr<f64>,
    le: Attr<f64>,
    decimal_places: Attr<u8>,
    default_value: Attr<Value>,
}

impl FieldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Attr::Value(name.into());
        self
    }

    pub fn set_type(&mut self, tag: impl Into<String>) -> &mut Self {
        self.field_type = Attr::Value(tag.into());
        self
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Attr::Value(alias.into());
        self
    }

    pub fn set_factory(&mut self, tag: impl Into<String>) -> &mut Self {
        self.factory = Attr::Value(tag.into());
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = Attr::Value(required);
        self
    }

    pub fn set_unique(&mut self, unique: bool) -> &mut Self {
        self.unique = Attr::Value(unique);
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.pattern = Attr::Value(pattern.into());
        self
    }

    pub fn set_min_length(&mut self, min_length: usize) -> &mut Self {
        self.min_length = Attr::Value(min_length);
        self
    }

    pub fn set_max_length(&mut self, max_length: usize) -> &mut Self {
        self.max_length = Attr::Value(max_length);
        self
    }

    pub fn set_gt(&mut self, gt: f64) -> &mut Self {
        self.gt = Attr::Value(gt);
        self
    }

    pub fn set_ge(&mut self, ge: f64) -> &mut Self {
        self.ge = Attr::Value(ge);
        self
    }

    pub fn set_lt(&mut self, lt: f64) -> &mut Self {
        self.lt = Attr::Value(lt);
        self
    }

    pub fn set_le(&mut self, le: f64) -> &mut Self {
        self.le = Attr::Value(le);
        self
    }

    pub fn set_decimal_places(&mut self, decimal_places: u8) -> &mut Self {
        self.decimal_places = Attr::Value(decimal_places);
        self
    }

    pub fn set_default_value(&mut self, value: Value) -> &mut Self {
        self.default_value = Attr::Value(value);
        self
    }

    /// The raw type tag, when one has been set
    pub fn type_tag(&self) -> Option<&str> {
        self.field_type.value().map(|s| s.as_str())
    }

    /// Whether the given attribute is still unset
    pub fn is_unset(&self, attribute: &str) -> bool {
        match attribute {
            "name" => self.name.is_unset(),
            "type" => self.field_type.is_unset(),
            "alias" => self.alias.is_unset(),
            "factory" => self.factory.is_unset(),
            "required" => self.required.is_unset(),
            "unique" => self.unique.is_unset(),
            "pattern" => self.pattern.is_unset(),
            "min_length" => self.min_length.is_unset(),
            "max_length" => self.max_length.is_unset(),
            "gt" => self.gt.is_unset(),
            "ge" => self.ge.is_unset(),
            "lt" => self.lt.is_unset(),
            "le" => self.le.is_unset(),
            "decimal_places" => self.decimal_places.is_unset(),
            "default_value" => self.default_value.is_unset(),
            _ => false,
        }
    }

    /// Fill attributes from a previously exported JSON object.
    ///
    /// Absent or null keys stay unset; present keys must carry the right
    /// JSON type.
    pub fn populate(&mut self, value: &Value) -> Result<&mut Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                errors.push(SchemaError::type_mismatch("field", "object", "value"));
                return Err(errors);
            }
        };

        for (key, raw) in object {
            if raw.is_null() {
                continue;
            }
            match key.as_str() {
                "name" | "type" | "alias" | "factory" | "pattern" => match raw.as_str() {
                    Some(text) => {
                        match key.as_str() {
                            "name" => self.set_name(text),
                            "type" => self.set_type(text),
                            "alias" => self.set_alias(text),
                            "factory" => self.set_factory(text),
                            _ => self.set_pattern(text),
                        };
                    }
                    None => errors.push(SchemaError::type_mismatch(key, "string", "value")),
                },
                "required" | "unique" => match super::parse_boolean(key, raw) {
                    Ok(flag) => {
                        if key == "required" {
                            self.set_required(flag);
                        } else {
                            self.set_unique(flag);
                        }
                    }
                    Err(err) => errors.push(err),
                },
                "min_length" | "max_length" => match raw.as_u64() {
                    Some(n) => {
                        if key == "min_length" {
                            self.set_min_length(n as usize);
                        } else {
                            self.set_max_length(n as usize);
                        }
                    }
                    None => errors.push(SchemaError::type_mismatch(key, "integer", "value")),
                },
                "gt" | "ge" | "lt" | "le" => match raw.as_f64() {
                    Some(n) => {
                        match key.as_str() {
                            "gt" => self.set_gt(n),
                            "ge" => self.set_ge(n),
                            "lt" => self.set_lt(n),
                            _ => self.set_le(n),
                        };
                    }
                    None => errors.push(SchemaError::type_mismatch(key, "number", "value")),
                },
                "decimal_places" => match raw.as_u64() {
                    Some(n) if n <= u8::MAX as u64 => {
                        self.set_decimal_places(n as u8);
                    }
                    Some(n) => errors.push(SchemaError::constraint_violation(
                        key,
                        "value within [0, 10]",
                        n.to_string(),
                    )),
                    None => errors.push(SchemaError::type_mismatch(key, "integer", "value")),
                },
                "default_value" => {
                    self.set_default_value(raw.clone());
                }
                // Unknown keys are ignored so older exports stay loadable.
                _ => {}
            }
        }

        errors.into_result(self)
    }

    /// Validate every attribute and yield the immutable descriptor.
    ///
    /// Collects one error per offending attribute instead of stopping at
    /// the first failure.
    pub fn finalize(&self) -> Result<FieldDescriptor, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match self.name.value() {
            Some(name) => {
                if let Some(err) = identifier_error("name", name, 1, 64) {
                    errors.push(err);
                }
                name.clone()
            }
            None => {
                errors.push(SchemaError::missing_required("name"));
                String::new()
            }
        };

        let field_type = match self.field_type.value() {
            Some(tag) => match FieldType::parse(tag) {
                Ok(field_type) => Some(field_type),
                Err(err) => {
                    errors.push(err);
                    None
                }
            },
            None => Some(FieldType::default()),
        };

        if let Some(alias) = self.alias.value() {
            if let Some(err) = identifier_error("alias", alias, 1, 64) {
                errors.push(err);
            }
        }

        let factory = match self.factory.value() {
            Some(tag) => match Factory::parse(tag) {
                Ok(factory) => Some(factory),
                Err(err) => {
                    errors.push(err);
                    None
                }
            },
            None => Some(Factory::default()),
        };

        if let Some(pattern) = self.pattern.value() {
            if regex::Regex::new(pattern).is_err() {
                errors.push(SchemaError::invalid_format(
                    "pattern",
                    "a valid regular expression",
                    pattern,
                ));
            }
        }

        let decimal_places = self.decimal_places.value_or(2);
        if decimal_places > 10 {
            errors.push(SchemaError::constraint_violation(
                "decimal_places",
                "value within [0, 10]",
                decimal_places.to_string(),
            ));
        }

        let mut descriptor = FieldDescriptor {
            name,
            field_type: field_type.unwrap_or_default(),
            alias: self.alias.to_option(),
            factory: factory.unwrap_or_default(),
            required: self.required.value_or(false),
            unique: self.unique.value_or(false),
            pattern: self.pattern.to_option(),
            min_length: self.min_length.to_option(),
            max_length: self.max_length.to_option(),
            gt: self.gt.to_option(),
            ge: self.ge.to_option(),
            lt: self.lt.to_option(),
            le: self.le.to_option(),
            decimal_places,
            default_value: None,
        };

        // Default resolution needs a resolved type and factory; tag errors
        // above already cover the other cases.
        if field_type.is_some() && factory.is_some() {
            match resolve_value(&descriptor, self.default_value.to_option()) {
                Ok(resolution) => descriptor.default_value = resolution.into_value(),
                Err(err) => errors.push(err.with_attribute("default_value")),
            }
        }

        errors.into_result(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_minimal_field_defaults() {
        let field = FieldBuilder::new().set_name("title").finalize().unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.field_type, FieldType::Text);
        assert_eq!(field.factory, Factory::Manual);
        assert!(!field.required);
        assert!(!field.unique);
        assert_eq!(field.decimal_places, 2);
        assert!(field.default_value.is_none());
    }

    #[test]
    fn test_unset_name_is_missing_required() {
        let errors = FieldBuilder::new().finalize().unwrap_err();
        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredValue);
        assert_eq!(err.attribute(), "name");
    }

    #[test]
    fn test_one_error_per_offending_attribute() {
        let mut builder = FieldBuilder::new();
        builder
            .set_name("9bad")
            .set_type("decimal")
            .set_alias("also-bad")
            .set_decimal_places(11);
        let errors = builder.finalize().unwrap_err();
        let attributes: Vec<&str> = errors.iter().map(|e| e.attribute()).collect();
        assert!(attributes.contains(&"name"));
        assert!(attributes.contains(&"type"));
        assert!(attributes.contains(&"alias"));
        assert!(attributes.contains(&"decimal_places"));
    }

    #[test]
    fn test_default_value_validated_against_constraints() {
        let mut builder = FieldBuilder::new();
        builder
            .set_name("score")
            .set_type("integer")
            .set_ge(5.0)
            .set_gt(3.0)
            .set_default_value(json!(4));
        let errors = builder.finalize().unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.attribute(), "default_value");
        // The message carries the resolved bound, not the raw pair.
        assert!(err.details().unwrap().expected.contains(">= 5"));
    }

    #[test]
    fn test_required_manual_without_default_fails() {
        let mut builder = FieldBuilder::new();
        builder.set_name("email").set_required(true);
        let errors = builder.finalize().unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.code(), SchemaErrorCode::MissingRequiredValue);
        assert_eq!(err.attribute(), "default_value");
    }

    #[test]
    fn test_auto_factory_fills_default() {
        let mut builder = FieldBuilder::new();
        builder.set_name("token").set_type("uuid").set_factory("auto");
        let field = builder.finalize().unwrap();
        let value = field.default_value.unwrap();
        let parsed = Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_bad_pattern_reported_on_pattern_attribute() {
        let mut builder = FieldBuilder::new();
        builder.set_name("code").set_pattern("([broken");
        let errors = builder.finalize().unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.attribute(), "pattern");
        assert_eq!(err.code(), SchemaErrorCode::InvalidFormat);
    }

    #[test]
    fn test_populate_round_trips_attributes() {
        let mut builder = FieldBuilder::new();
        builder
            .populate(&json!({
                "name": "score",
                "type": "float",
                "factory": "manual",
                "required": true,
                "ge": 0.0,
                "lt": 100.0,
                "decimal_places": 3,
                "default_value": 50.5
            }))
            .unwrap();
        let field = builder.finalize().unwrap();
        assert_eq!(field.field_type, FieldType::Float);
        assert!(field.required);
        assert_eq!(field.ge, Some(0.0));
        assert_eq!(field.lt, Some(100.0));
        assert_eq!(field.decimal_places, 3);
        assert_eq!(field.default_value, Some(json!(50.5)));
    }

    #[test]
    fn test_populate_rejects_wrong_key_types() {
        let mut builder = FieldBuilder::new();
        let errors = builder
            .populate(&json!({"name": "ok", "min_length": "three"}))
            .unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.attribute(), "min_length");
        assert_eq!(err.code(), SchemaErrorCode::TypeMismatch);
    }

    #[test]
    fn test_populate_boolean_coercion() {
        let mut builder = FieldBuilder::new();
        builder
            .populate(&json!({"name": "flag", "required": "True", "unique": 1}))
            .unwrap();
        let errors = builder.finalize().unwrap_err();
        // required=true with no default is the only failure left.
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_is_unset_tracks_assignments() {
        let mut builder = FieldBuilder::new();
        assert!(builder.is_unset("name"));
        builder.set_name("x");
        assert!(!builder.is_unset("name"));
        assert!(builder.is_unset("pattern"));
    }
}
