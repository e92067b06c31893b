//! Table descriptor builder

use serde_json::Value;

use crate::schema::{FieldDescriptor, SchemaError, TableDescriptor, ValidationErrors};

use super::attr::Attr;
use super::field::FieldBuilder;
use super::identifier_error;

/// Accumulates a table name and its ordered fields.
///
/// Fields arrive already finalized; declaration order is preserved.
/// Duplicate field names are tolerated (no uniqueness check).
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    name: Attr<String>,
    fields: Vec<FieldDescriptor>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Attr::Value(name.into());
        self
    }

    pub fn add_field(&mut self, field: FieldDescriptor) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn set_fields(&mut self, fields: Vec<FieldDescriptor>) -> &mut Self {
        self.fields = fields;
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_name_unset(&self) -> bool {
        self.name.is_unset()
    }

    /// Fill from a previously exported JSON object; each nested field runs
    /// through its own builder so the whole document is re-validated.
    pub fn populate(&mut self, value: &Value) -> Result<&mut Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let object = match value.as_object() {
            Some(object) => object,
            None => {
                errors.push(SchemaError::type_mismatch("table", "object", "value"));
                return Err(errors);
            }
        };

        if let Some(raw) = object.get("name") {
            match raw.as_str() {
                Some(name) => {
                    self.set_name(name);
                }
                None => errors.push(SchemaError::type_mismatch("name", "string", "value")),
            }
        }

        if let Some(raw) = object.get("fields") {
            match raw.as_array() {
                Some(entries) => {
                    for (index, entry) in entries.iter().enumerate() {
                        let mut builder = FieldBuilder::new();
                        let finalized = builder
                            .populate(entry)
                            .map(|b| b.finalize())
                            .unwrap_or_else(Err);
                        match finalized {
                            Ok(field) => {
                                self.add_field(field);
                            }
                            Err(nested) => {
                                for err in nested {
                                    let attribute =
                                        format!("fields[{}].{}", index, err.attribute());
                                    errors.push(err.with_attribute(attribute));
                                }
                            }
                        }
                    }
                }
                None => errors.push(SchemaError::type_mismatch("fields", "array", "value")),
            }
        }

        errors.into_result(self)
    }

    /// Validate the table name and yield the immutable descriptor.
    ///
    /// An empty field sequence is valid.
    pub fn finalize(&self) -> Result<TableDescriptor, ValidationErrors> {
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

        errors.into_result(TableDescriptor {
            name,
            fields: self.fields.clone(),
        })
    }
}
