//! Table rendering for finalized descriptors

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use serde_json::Value;

use crate::schema::{DataSourceDescriptor, FieldDescriptor, TableDescriptor};

const MASK: &str = "********";

/// Render connection metadata as an attribute/value table.
///
/// The password is masked; exports carry the real value, rendered output
/// never does.
pub fn source_table(source: &DataSourceDescriptor) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["attribute", "value"]);
    table.add_row(vec![Cell::new("name"), Cell::new(&source.name)]);
    table.add_row(vec![Cell::new("kind"), Cell::new(source.kind.tag())]);
    table.add_row(vec![Cell::new("host"), Cell::new(&source.host)]);
    table.add_row(vec![Cell::new("port"), Cell::new(source.port)]);
    table.add_row(vec![Cell::new("user"), Cell::new(&source.user)]);
    table.add_row(vec![Cell::new("password"), Cell::new(MASK)]);
    table
}

/// Render a table descriptor's fields, one row per column
pub fn fields_table(descriptor: &TableDescriptor) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "name", "type", "factory", "required", "unique", "constraints", "default",
        ]);
    for field in &descriptor.fields {
        table.add_row(vec![
            Cell::new(field.display_name()),
            Cell::new(field.field_type.type_name()),
            Cell::new(field.factory.tag()),
            Cell::new(field.required),
            Cell::new(field.unique),
            Cell::new(constraint_summary(field)),
            Cell::new(format_default(field)),
        ]);
    }
    table
}

/// One line summarizing the field's active constraints: the resolved
/// range (never the raw bound pair), length limits, pattern
pub fn constraint_summary(field: &FieldDescriptor) -> String {
    let mut parts = Vec::new();

    let range = field.resolved_range();
    if !range.is_unconstrained() {
        parts.push(format!("range {}", range));
    }
    match (field.min_length, field.max_length) {
        (Some(min), Some(max)) => parts.push(format!("length [{}, {}]", min, max)),
        (Some(min), None) => parts.push(format!("length >= {}", min)),
        (None, Some(max)) => parts.push(format!("length <= {}", max)),
        (None, None) => {}
    }
    if let Some(pattern) = &field.pattern {
        parts.push(format!("pattern {}", pattern));
    }

    parts.join(", ")
}

/// Render the default value, applying the field's decimal precision to
/// float defaults
pub fn format_default(field: &FieldDescriptor) -> String {
    match &field.default_value {
        None => String::new(),
        Some(Value::Number(n)) if n.is_f64() => match n.as_f64() {
            Some(f) => format!("{:.*}", field.decimal_places as usize, f),
            None => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
