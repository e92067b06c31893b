//! Data source descriptor builder

use serde_json::Value;

use crate::schema::{DataSourceDescriptor, SchemaError, SourceKind, ValidationErrors};

use super::attr::Attr;
use super::{identifier_error, length_error};

/// Accumulates connection metadata. Every attribute is required.
#[derive(Debug, Clone, Default)]
pub struct DataSourceBuilder {
    name: Attr<String>,
    kind: Attr<String>,
    host: Attr<String>,
    port: Attr<u64>,
    user: Attr<String>,
    password: Attr<String>,
}

impl DataSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Attr::Value(name.into());
        self
    }

    pub fn set_kind(&mut self, kind: impl Into<String>) -> &mut Self {
        self.kind = Attr::Value(kind.into());
        self
    }

    pub fn set_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = Attr::Value(host.into());
        self
    }

    pub fn set_port(&mut self, port: u64) -> &mut Self {
        self.port = Attr::Value(port);
        self
    }

    pub fn set_user(&mut self, user: impl Into<String>) -> &mut Self {
        self.user = Attr::Value(user.into());
        self
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.password = Attr::Value(password.into());
        self
    }

    /// Whether the given attribute is still unset
    pub fn is_unset(&self, attribute: &str) -> bool {
        match attribute {
            "name" => self.name.is_unset(),
            "kind" => self.kind.is_unset(),
            "host" => self.host.is_unset(),
            "port" => self.port.is_unset(),
            "user" => self.user.is_unset(),
            "password" => self.password.is_unset(),
            _ => false,
        }
    }

    /// Fill from a previously exported JSON object
    pub fn populate(&mut self, value: &Value) -> Result<&mut Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                errors.push(SchemaError::type_mismatch("source", "object", "value"));
                return Err(errors);
            }
        };

        for (key, raw) in object {
            if raw.is_null() {
                continue;
            }
            match key.as_str() {
                "name" | "kind" | "host" | "user" | "password" => match raw.as_str() {
                    Some(text) => {
                        match key.as_str() {
                            "name" => self.set_name(text),
                            "kind" => self.set_kind(text),
                            "host" => self.set_host(text),
                            "user" => self.set_user(text),
                            _ => self.set_password(text),
                        };
                    }
                    None => errors.push(SchemaError::type_mismatch(key, "string", "value")),
                },
                "port" => match raw.as_u64() {
                    Some(port) => {
                        self.set_port(port);
                    }
                    None => errors.push(SchemaError::type_mismatch(key, "integer", "value")),
                },
                _ => {}
            }
        }

        errors.into_result(self)
    }

    /// Validate every attribute and yield the immutable descriptor
    pub fn finalize(&self) -> Result<DataSourceDescriptor, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = match self.name.value() {
            Some(name) => {
                if let Some(err) = identifier_error("name", name, 2, 32) {
                    errors.push(err);
                }
                name.clone()
            }
            None => {
                errors.push(SchemaError::missing_required("name"));
                String::new()
            }
        };

        let kind = match self.kind.value() {
            Some(tag) => match SourceKind::parse(tag) {
                Ok(kind) => kind,
                Err(err) => {
                    errors.push(err);
                    SourceKind::Sqlite
                }
            },
            None => {
                errors.push(SchemaError::missing_required("kind"));
                SourceKind::Sqlite
            }
        };

        let host = match self.host.value() {
            Some(host) => {
                if let Some(err) = length_error("host", host, 1, 512) {
                    errors.push(err);
                }
                host.clone()
            }
            None => {
                errors.push(SchemaError::missing_required("host"));
                String::new()
            }
        };

        let port = match self.port.value() {
            Some(&port) if port <= u16::MAX as u64 => port as u16,
            Some(&port) => {
                errors.push(SchemaError::constraint_violation(
                    "port",
                    "value within [0, 65535]",
                    port.to_string(),
                ));
                0
            }
            None => {
                errors.push(SchemaError::missing_required("port"));
                0
            }
        };

        let user = match self.user.value() {
            Some(user) => {
                if let Some(err) = identifier_error("user", user, 1, 64) {
                    errors.push(err);
                }
                user.clone()
            }
            None => {
                errors.push(SchemaError::missing_required("user"));
                String::new()
            }
        };

        let password = match self.password.value() {
            Some(password) => {
                if let Some(err) = length_error("password", password, 1, 512) {
                    errors.push(err);
                }
                password.clone()
            }
            None => {
                errors.push(SchemaError::missing_required("password"));
                String::new()
            }
        };

        errors.into_result(DataSourceDescriptor {
            name,
            kind,
            host,
            port,
            user,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    fn complete_builder() -> DataSourceBuilder {
        let mut builder = DataSourceBuilder::new();
        builder
            .set_name("orders_db")
            .set_kind("postgresql")
            .set_host("db.internal")
            .set_port(5432)
            .set_user("loader")
            .set_password("hunter2");
        builder
    }

    #[test]
    fn test_complete_source_finalizes() {
        let source = complete_builder().finalize().unwrap();
        assert_eq!(source.kind, SourceKind::Postgresql);
        assert_eq!(source.port, 5432);
    }

    #[test]
    fn test_every_missing_attribute_reported() {
        let errors = DataSourceBuilder::new().finalize().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors
            .iter()
            .all(|e| e.code() == SchemaErrorCode::MissingRequiredValue));
    }

    #[test]
    fn test_port_over_limit_rejected() {
        let mut builder = complete_builder();
        builder.set_port(70000);
        let errors = builder.finalize().unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.attribute(), "port");
        assert!(err.details().unwrap().expected.contains("[0, 65535]"));
    }

    #[test]
    fn test_unknown_kind_carries_choices() {
        let mut builder = complete_builder();
        builder.set_kind("mongodb");
        let errors = builder.finalize().unwrap_err();
        let err = errors.iter().next().unwrap();
        assert_eq!(err.attribute(), "kind");
        assert!(err.choices().contains(&"postgresql".to_string()));
    }

    #[test]
    fn test_short_name_rejected() {
        let mut builder = complete_builder();
        builder.set_name("x");
        let errors = builder.finalize().unwrap_err();
        assert_eq!(errors.iter().next().unwrap().attribute(), "name");
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut builder = complete_builder();
        builder.set_host("");
        let errors = builder.finalize().unwrap_err();
        assert_eq!(errors.iter().next().unwrap().attribute(), "host");
    }

    #[test]
    fn test_populate_round_trips() {
        let source = complete_builder().finalize().unwrap();
        let exported = serde_json::to_value(&source).unwrap();
        let mut builder = DataSourceBuilder::new();
        builder.populate(&exported).unwrap();
        assert_eq!(builder.finalize().unwrap(), source);
    }

    #[test]
    fn test_populate_rejects_non_integer_port() {
        let mut builder = DataSourceBuilder::new();
        let errors = builder.populate(&json!({"port": "5432"})).unwrap_err();
        assert_eq!(errors.iter().next().unwrap().attribute(), "port");
    }
}
