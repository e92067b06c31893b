//! Static attribute metadata
//!
//! One table per descriptor kind, mapping attribute name to its label,
//! hint text, choice set and prompt visibility. Declared once as const
//! data; the interactive layer renders prompts from it and never
//! introspects the descriptors at runtime.

use crate::schema::{FACTORY_CHOICES, SOURCE_KIND_CHOICES, TYPE_CHOICES};

/// Presentation metadata for one builder attribute
#[derive(Debug, Clone, Copy)]
pub struct AttributeMeta {
    /// Attribute key as the builders know it
    pub attribute: &'static str,
    /// Human-facing label
    pub label: &'static str,
    /// One-line hint shown at the prompt
    pub hint: &'static str,
    /// Permitted values when the attribute is enumerated
    pub choices: &'static [&'static str],
    /// Whether prompt input should not be echoed back in output
    pub hidden: bool,
}

impl AttributeMeta {
    /// The bracketed hint line rendered above the prompt
    pub fn prompt_hint(&self) -> String {
        let mut hint = format!("[{}]", self.hint);
        if !self.choices.is_empty() {
            hint.push_str(&format!("[Choices: {}]", self.choices.join(", ")));
        }
        hint
    }
}

/// Field descriptor attributes in prompting order
pub const FIELD_ATTRIBUTES: &[AttributeMeta] = &[
    AttributeMeta {
        attribute: "name",
        label: "Field name",
        hint: "Required, identifier, max 64 characters",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "type",
        label: "Field type",
        hint: "Optional, default: text",
        choices: TYPE_CHOICES,
        hidden: false,
    },
    AttributeMeta {
        attribute: "alias",
        label: "Field alias",
        hint: "Optional, identifier used in external representations",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "factory",
        label: "Field factory",
        hint: "Optional, default: manual",
        choices: FACTORY_CHOICES,
        hidden: false,
    },
    AttributeMeta {
        attribute: "required",
        label: "Field required",
        hint: "Optional, default: false",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "unique",
        label: "Field unique",
        hint: "Optional, default: false",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "pattern",
        label: "Field pattern",
        hint: "Optional, text fields only, anchored regular expression",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "min_length",
        label: "Field min length",
        hint: "Optional, text fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "max_length",
        label: "Field max length",
        hint: "Optional, text fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "gt",
        label: "Greater than",
        hint: "Optional, numeric fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "ge",
        label: "Greater or equal",
        hint: "Optional, numeric fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "lt",
        label: "Less than",
        hint: "Optional, numeric fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "le",
        label: "Less or equal",
        hint: "Optional, numeric fields only",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "decimal_places",
        label: "Decimal places",
        hint: "Optional, 0-10, default: 2",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "default_value",
        label: "Default value",
        hint: "Optional unless required; generated when factory is auto",
        choices: &[],
        hidden: false,
    },
];

/// Table descriptor attributes
pub const TABLE_ATTRIBUTES: &[AttributeMeta] = &[AttributeMeta {
    attribute: "name",
    label: "Table name",
    hint: "Required, identifier, max 64 characters",
    choices: &[],
    hidden: false,
}];

/// Data source descriptor attributes in prompting order
pub const SOURCE_ATTRIBUTES: &[AttributeMeta] = &[
    AttributeMeta {
        attribute: "name",
        label: "Data source name",
        hint: "Required, identifier, 2-32 characters",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "kind",
        label: "Data source kind",
        hint: "Required",
        choices: SOURCE_KIND_CHOICES,
        hidden: false,
    },
    AttributeMeta {
        attribute: "host",
        label: "Data source host",
        hint: "Required, 1-512 characters",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "port",
        label: "Data source port",
        hint: "Required, 0-65535",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "user",
        label: "Data source user",
        hint: "Required, identifier, max 64 characters",
        choices: &[],
        hidden: false,
    },
    AttributeMeta {
        attribute: "password",
        label: "Data source password",
        hint: "Required, 1-512 characters",
        choices: &[],
        hidden: true,
    },
];

/// Find an attribute's metadata within a table
pub fn lookup<'a>(table: &'a [AttributeMeta], attribute: &str) -> Option<&'a AttributeMeta> {
    table.iter().find(|meta| meta.attribute == attribute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, SourceKind};

    #[test]
    fn test_lookup_finds_attributes() {
        assert!(lookup(FIELD_ATTRIBUTES, "name").is_some());
        assert!(lookup(FIELD_ATTRIBUTES, "default_value").is_some());
        assert!(lookup(SOURCE_ATTRIBUTES, "password").unwrap().hidden);
        assert!(lookup(FIELD_ATTRIBUTES, "nonexistent").is_none());
    }

    #[test]
    fn test_type_choices_match_registry() {
        let meta = lookup(FIELD_ATTRIBUTES, "type").unwrap();
        for tag in meta.choices {
            assert!(FieldType::parse(tag).is_ok());
        }
        assert_eq!(meta.choices.len(), TYPE_CHOICES.len());
    }

    #[test]
    fn test_kind_choices_match_registry() {
        let meta = lookup(SOURCE_ATTRIBUTES, "kind").unwrap();
        for tag in meta.choices {
            assert!(SourceKind::parse(tag).is_ok());
        }
    }

    #[test]
    fn test_prompt_hint_renders_choices() {
        let meta = lookup(FIELD_ATTRIBUTES, "factory").unwrap();
        let hint = meta.prompt_hint();
        assert!(hint.contains("default: manual"));
        assert!(hint.contains("Choices: auto, manual"));
    }

    #[test]
    fn test_every_field_attribute_is_unique() {
        for (i, meta) in FIELD_ATTRIBUTES.iter().enumerate() {
            for other in &FIELD_ATTRIBUTES[i + 1..] {
                assert_ne!(meta.attribute, other.attribute);
            }
        }
    }
}
