//! Schema type definitions
//!
//! Supported field types:
//! - integer: 64-bit signed integer
//! - float: 64-bit floating point
//! - text: UTF-8 string
//! - boolean: Boolean
//! - datetime: Unix millisecond timestamp
//! - uuid: version-4 UUID string
//! - json: nested object (no value semantics)
//! - list: array (no value semantics)

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::bounds::ResolvedRange;
use super::errors::{SchemaError, SchemaResult};

/// Registered type tags
pub const TYPE_CHOICES: &[&str] = &[
    "integer", "float", "text", "boolean", "datetime", "uuid", "json", "list",
];

/// Factory policy tags
pub const FACTORY_CHOICES: &[&str] = &["auto", "manual"];

/// Supported data source kinds
pub const SOURCE_KIND_CHOICES: &[&str] = &["mysql", "mssql", "sqlite", "postgresql", "oracle"];

/// Supported field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// UTF-8 string
    Text,
    /// Boolean
    Boolean,
    /// Unix millisecond timestamp
    Datetime,
    /// Version-4 UUID string
    Uuid,
    /// Nested object
    Json,
    /// Array
    List,
}

impl FieldType {
    /// Resolve a raw tag against the registry
    pub fn parse(tag: &str) -> SchemaResult<Self> {
        match tag {
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "text" => Ok(FieldType::Text),
            "boolean" => Ok(FieldType::Boolean),
            "datetime" => Ok(FieldType::Datetime),
            "uuid" => Ok(FieldType::Uuid),
            "json" => Ok(FieldType::Json),
            "list" => Ok(FieldType::List),
            other => Err(SchemaError::unknown_type("type", other, TYPE_CHOICES)),
        }
    }

    /// Returns the type tag for error messages and exports
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Datetime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::Json => "json",
            FieldType::List => "list",
        }
    }

    /// Whether the resolved numeric range applies to this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float | FieldType::Datetime)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

/// Default-value generation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factory {
    /// Synthesize a seed value when none is supplied
    Auto,
    /// Values are always supplied by the operator
    Manual,
}

impl Factory {
    pub fn parse(tag: &str) -> SchemaResult<Self> {
        match tag {
            "auto" => Ok(Factory::Auto),
            "manual" => Ok(Factory::Manual),
            other => Err(SchemaError::constraint_violation(
                "factory",
                "one of the factory tags",
                other,
            )
            .with_choices(FACTORY_CHOICES)),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Factory::Auto => "auto",
            Factory::Manual => "manual",
        }
    }
}

impl Default for Factory {
    fn default() -> Self {
        Factory::Manual
    }
}

/// Closed set of data source kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mysql,
    Mssql,
    Sqlite,
    Postgresql,
    Oracle,
}

impl SourceKind {
    pub fn parse(tag: &str) -> SchemaResult<Self> {
        match tag {
            "mysql" => Ok(SourceKind::Mysql),
            "mssql" => Ok(SourceKind::Mssql),
            "sqlite" => Ok(SourceKind::Sqlite),
            "postgresql" => Ok(SourceKind::Postgresql),
            "oracle" => Ok(SourceKind::Oracle),
            other => Err(SchemaError::constraint_violation(
                "kind",
                "one of the data source kinds",
                other,
            )
            .with_choices(SOURCE_KIND_CHOICES)),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Mysql => "mysql",
            SourceKind::Mssql => "mssql",
            SourceKind::Sqlite => "sqlite",
            SourceKind::Postgresql => "postgresql",
            SourceKind::Oracle => "oracle",
        }
    }
}

/// Synthesize the seed value for the given type.
///
/// Returns `None` for tags without value semantics; callers treat that as
/// a failure. Invoked only for `factory = auto` with no supplied value.
pub fn auto_generate(field_type: FieldType) -> Option<Value> {
    match field_type {
        FieldType::Integer => Some(Value::from(0)),
        FieldType::Float => Some(Value::from(0.0)),
        FieldType::Text => Some(Value::from("")),
        FieldType::Boolean => Some(Value::from(false)),
        FieldType::Datetime => Some(Value::from(Utc::now().timestamp_millis())),
        FieldType::Uuid => Some(Value::from(Uuid::new_v4().to_string())),
        FieldType::Json | FieldType::List => None,
    }
}

fn default_decimal_places() -> u8 {
    2
}

/// One table column's schema, immutable once finalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Identifier, `^[A-Za-z][A-Za-z0-9_]*$`, max length 64
    pub name: String,
    /// Declared type tag
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Identifier-shaped rename for external representation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Default-value generation policy
    #[serde(default)]
    pub factory: Factory,
    /// Whether a value must be present
    #[serde(default)]
    pub required: bool,
    /// Descriptive uniqueness marker (not enforced across rows)
    #[serde(default)]
    pub unique: bool,
    /// Text-only: anchored regular expression the value must fully match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Text-only: minimum character count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Text-only: maximum character count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Numeric: exclusive lower bound declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    /// Numeric: inclusive lower bound declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ge: Option<f64>,
    /// Numeric: exclusive upper bound declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    /// Numeric: inclusive upper bound declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub le: Option<f64>,
    /// Numeric: display precision, 0-10
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u8,
    /// Validated default value, filled by the auto factory when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldDescriptor {
    /// The name used in external representations: alias when present
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The effective numeric range after reconciling raw declarations
    pub fn resolved_range(&self) -> ResolvedRange {
        ResolvedRange::resolve(self.gt, self.ge, self.lt, self.le)
    }
}

/// A named, ordered sequence of field descriptors.
///
/// Field order is declaration order. Duplicate field names are tolerated
/// (documented current behavior, no uniqueness check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Identifier, `^[A-Za-z][A-Za-z0-9_]*$`, max length 64
    pub name: String,
    /// Declaration-ordered columns; may be empty
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TableDescriptor {
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Connection metadata for one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceDescriptor {
    /// Identifier, 2-32 characters
    pub name: String,
    /// Source kind tag
    pub kind: SourceKind,
    /// Host, 1-512 characters
    pub host: String,
    /// Port, 0-65535
    pub port: u16,
    /// Identifier, 1-64 characters
    pub user: String,
    /// Password, 1-512 characters; masked in rendered output
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_resolves_every_tag() {
        for tag in TYPE_CHOICES {
            let field_type = FieldType::parse(tag).unwrap();
            assert_eq!(field_type.type_name(), *tag);
        }
    }

    #[test]
    fn test_unknown_tag_rejected_with_choices() {
        let err = FieldType::parse("decimal").unwrap_err();
        assert_eq!(err.code().code(), "SDOC_UNKNOWN_TYPE");
        assert_eq!(err.choices().len(), TYPE_CHOICES.len());
    }

    #[test]
    fn test_default_type_is_text() {
        assert_eq!(FieldType::default(), FieldType::Text);
    }

    #[test]
    fn test_default_factory_is_manual() {
        assert_eq!(Factory::default(), Factory::Manual);
    }

    #[test]
    fn test_factory_parse() {
        assert_eq!(Factory::parse("auto").unwrap(), Factory::Auto);
        assert_eq!(Factory::parse("manual").unwrap(), Factory::Manual);
        assert!(Factory::parse("lazy").is_err());
    }

    #[test]
    fn test_source_kind_parse() {
        for tag in SOURCE_KIND_CHOICES {
            assert_eq!(SourceKind::parse(tag).unwrap().tag(), *tag);
        }
        let err = SourceKind::parse("mongodb").unwrap_err();
        assert!(!err.choices().is_empty());
    }

    #[test]
    fn test_auto_generate_seed_values() {
        assert_eq!(auto_generate(FieldType::Integer), Some(Value::from(0)));
        assert_eq!(auto_generate(FieldType::Float), Some(Value::from(0.0)));
        assert_eq!(auto_generate(FieldType::Text), Some(Value::from("")));
        assert_eq!(auto_generate(FieldType::Boolean), Some(Value::from(false)));
    }

    #[test]
    fn test_auto_generate_uuid_is_v4() {
        let value = auto_generate(FieldType::Uuid).unwrap();
        let parsed = Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_auto_generate_datetime_is_current_millis() {
        let before = Utc::now().timestamp_millis();
        let value = auto_generate(FieldType::Datetime).unwrap();
        let after = Utc::now().timestamp_millis();
        let millis = value.as_i64().unwrap();
        assert!(millis >= before && millis <= after);
    }

    #[test]
    fn test_auto_generate_unsupported_tags() {
        assert_eq!(auto_generate(FieldType::Json), None);
        assert_eq!(auto_generate(FieldType::List), None);
    }

    #[test]
    fn test_field_type_serde_tags() {
        let json = serde_json::to_string(&FieldType::Datetime).unwrap();
        assert_eq!(json, "\"datetime\"");
        let parsed: FieldType = serde_json::from_str("\"uuid\"").unwrap();
        assert_eq!(parsed, FieldType::Uuid);
    }

    #[test]
    fn test_display_name_prefers_alias() {
        let field = FieldDescriptor {
            name: "user_id".into(),
            field_type: FieldType::Integer,
            alias: Some("id".into()),
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
        };
        assert_eq!(field.display_name(), "id");
    }
}
