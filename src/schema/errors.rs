//! Schema engine error types
//!
//! Error codes:
//! - SDOC_UNKNOWN_TYPE (unregistered type tag)
//! - SDOC_TYPE_MISMATCH (value type disagrees with the declared type)
//! - SDOC_MISSING_REQUIRED_VALUE (required attribute left unset)
//! - SDOC_CONSTRAINT_VIOLATION (length/pattern/range rule failed)
//! - SDOC_INVALID_FORMAT (UUID/datetime/regex parse failure)
//! - SDOC_UNSUPPORTED_TYPE (tag has no value semantics)
//!
//! Every error names the offending attribute so the interactive layer can
//! target exactly one re-prompt. Errors about constrained values carry the
//! resolved rule, not the raw declarations.

use std::fmt;

/// Engine error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Type tag not in the registry
    UnknownType,
    /// Value type disagrees with the declared type
    TypeMismatch,
    /// Required attribute has no value
    MissingRequiredValue,
    /// Length, pattern or range rule failed
    ConstraintViolation,
    /// Value failed to parse in its declared format
    InvalidFormat,
    /// Type tag carries no value semantics
    UnsupportedType,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownType => "SDOC_UNKNOWN_TYPE",
            SchemaErrorCode::TypeMismatch => "SDOC_TYPE_MISMATCH",
            SchemaErrorCode::MissingRequiredValue => "SDOC_MISSING_REQUIRED_VALUE",
            SchemaErrorCode::ConstraintViolation => "SDOC_CONSTRAINT_VIOLATION",
            SchemaErrorCode::InvalidFormat => "SDOC_INVALID_FORMAT",
            SchemaErrorCode::UnsupportedType => "SDOC_UNSUPPORTED_TYPE",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Expected/actual pair attached to validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Expected type, format or resolved rule
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.actual)
    }
}

/// Schema error with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    /// Offending attribute or field name
    attribute: String,
    /// Human-readable message
    message: String,
    /// Expected/actual details if applicable
    details: Option<ValidationDetails>,
    /// Permitted values for enumerated attributes
    choices: Vec<String>,
}

impl SchemaError {
    /// Create an unknown type error carrying the registered tags
    pub fn unknown_type(attribute: impl Into<String>, tag: impl Into<String>, choices: &[&str]) -> Self {
        let tag = tag.into();
        Self {
            code: SchemaErrorCode::UnknownType,
            attribute: attribute.into(),
            message: format!("type '{}' is not registered", tag),
            details: Some(ValidationDetails::new("a registered type tag", tag)),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(expected, actual);
        Self {
            code: SchemaErrorCode::TypeMismatch,
            attribute: attribute.into(),
            message: format!("value has the wrong type: {}", details),
            details: Some(details),
            choices: Vec::new(),
        }
    }

    /// Create a missing required value error
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MissingRequiredValue,
            attribute: attribute.into(),
            message: "a value is required".into(),
            details: Some(ValidationDetails::new("a value", "nothing")),
            choices: Vec::new(),
        }
    }

    /// Create a constraint violation carrying the resolved rule
    pub fn constraint_violation(
        attribute: impl Into<String>,
        rule: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(rule, actual);
        Self {
            code: SchemaErrorCode::ConstraintViolation,
            attribute: attribute.into(),
            message: format!("constraint failed: {}", details),
            details: Some(details),
            choices: Vec::new(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let details = ValidationDetails::new(expected, actual);
        Self {
            code: SchemaErrorCode::InvalidFormat,
            attribute: attribute.into(),
            message: format!("value is malformed: {}", details),
            details: Some(details),
            choices: Vec::new(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(attribute: impl Into<String>, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            code: SchemaErrorCode::UnsupportedType,
            attribute: attribute.into(),
            message: format!("type '{}' does not support values", tag),
            details: None,
            choices: Vec::new(),
        }
    }

    /// Re-attribute this error (builders map engine errors onto their
    /// own attribute names)
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Attach the permitted values for an enumerated attribute
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the offending attribute or field name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns expected/actual details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns the permitted values for enumerated attributes
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}' {}", self.code.code(), self.attribute, self.message)?;
        if !self.choices.is_empty() {
            write!(f, " (choices: {})", self.choices.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for engine operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Error collection returned by finalize: one entry per offending attribute
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<SchemaError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: SchemaError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.errors.iter()
    }

    /// Consume and yield the descriptor when nothing failed
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<SchemaError> for ValidationErrors {
    fn from(error: SchemaError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(SchemaErrorCode::UnknownType.code(), "SDOC_UNKNOWN_TYPE");
        assert_eq!(SchemaErrorCode::TypeMismatch.code(), "SDOC_TYPE_MISMATCH");
        assert_eq!(
            SchemaErrorCode::MissingRequiredValue.code(),
            "SDOC_MISSING_REQUIRED_VALUE"
        );
        assert_eq!(
            SchemaErrorCode::ConstraintViolation.code(),
            "SDOC_CONSTRAINT_VIOLATION"
        );
        assert_eq!(SchemaErrorCode::InvalidFormat.code(), "SDOC_INVALID_FORMAT");
        assert_eq!(SchemaErrorCode::UnsupportedType.code(), "SDOC_UNSUPPORTED_TYPE");
    }

    #[test]
    fn test_error_display_names_the_attribute() {
        let err = SchemaError::missing_required("host");
        let display = format!("{}", err);
        assert!(display.contains("SDOC_MISSING_REQUIRED_VALUE"));
        assert!(display.contains("host"));
    }

    #[test]
    fn test_unknown_type_carries_choices() {
        let err = SchemaError::unknown_type("type", "decimal", &["integer", "float"]);
        assert_eq!(err.choices(), &["integer".to_string(), "float".to_string()]);
        assert!(format!("{}", err).contains("choices: integer, float"));
    }

    #[test]
    fn test_with_attribute_reassigns() {
        let err = SchemaError::type_mismatch("age", "integer", "string").with_attribute("default_value");
        assert_eq!(err.attribute(), "default_value");
    }

    #[test]
    fn test_validation_errors_collects() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.push(SchemaError::missing_required("name"));
        errors.push(SchemaError::missing_required("host"));
        assert_eq!(errors.len(), 2);
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_into_result_passes_clean() {
        let errors = ValidationErrors::new();
        assert!(errors.into_result(42).is_ok());
    }
}
