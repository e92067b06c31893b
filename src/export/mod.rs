//! JSON persistence for finalized descriptors
//!
//! Exported files are plain JSON objects keyed by the descriptors'
//! declared attribute names, one namespaced file per document:
//! - `<namespace>-source-config.json` for a data source
//! - `<namespace>-table-<table>-config.json` for one table
//! - `<namespace>-tables-config.json` for a combined table set
//! - `<namespace>-docs-config.json` for a whole source document
//!
//! Loading always goes back through the builders, so a loaded document is
//! re-validated and `finalize(populate(export(d)))` reproduces `d`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::configurator::{DataSourceBuilder, TableBuilder};
use crate::schema::{DataSourceDescriptor, FieldDescriptor, TableDescriptor, ValidationErrors};

/// File-name shape of a data source document
pub const SOURCE_DOC_PATTERN: &str = r"^.+-source-config\.json$";
/// File-name shape of a single-table document
pub const TABLE_DOC_PATTERN: &str = r"^.+-table-.+-config\.json$";
/// File-name shape of a combined table-set document
pub const TABLE_SET_DOC_PATTERN: &str = r"^.+-tables-config\.json$";
/// File-name shape of a whole source document
pub const SOURCE_DOCS_PATTERN: &str = r"^.+-docs-config\.json$";

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("document '{path}' failed validation: {errors}")]
    Invalid {
        path: String,
        errors: ValidationErrors,
    },
}

impl ExportError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            source,
        }
    }

    fn invalid(path: &Path, errors: ValidationErrors) -> Self {
        Self::Invalid {
            path: path.display().to_string(),
            errors,
        }
    }

    /// The per-attribute errors when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Result type for persistence operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Kind of an exported document, classified from its file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Source,
    Table,
    TableSet,
    Document,
}

fn classifier(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("document pattern compiles"))
}

/// Classify a file name against the known document shapes
pub fn classify(file_name: &str) -> Option<DocKind> {
    static SOURCE_RE: OnceLock<Regex> = OnceLock::new();
    static TABLE_RE: OnceLock<Regex> = OnceLock::new();
    static TABLE_SET_RE: OnceLock<Regex> = OnceLock::new();
    static DOCS_RE: OnceLock<Regex> = OnceLock::new();

    if classifier(&DOCS_RE, SOURCE_DOCS_PATTERN).is_match(file_name) {
        Some(DocKind::Document)
    } else if classifier(&SOURCE_RE, SOURCE_DOC_PATTERN).is_match(file_name) {
        Some(DocKind::Source)
    } else if classifier(&TABLE_SET_RE, TABLE_SET_DOC_PATTERN).is_match(file_name) {
        Some(DocKind::TableSet)
    } else if classifier(&TABLE_RE, TABLE_DOC_PATTERN).is_match(file_name) {
        Some(DocKind::Table)
    } else {
        None
    }
}

pub fn source_doc_path(dir: &Path, namespace: &str) -> PathBuf {
    dir.join(format!("{}-source-config.json", namespace))
}

pub fn table_doc_path(dir: &Path, namespace: &str, table: &str) -> PathBuf {
    dir.join(format!("{}-table-{}-config.json", namespace, table))
}

pub fn table_set_doc_path(dir: &Path, namespace: &str) -> PathBuf {
    dir.join(format!("{}-tables-config.json", namespace))
}

pub fn source_docs_path(dir: &Path, namespace: &str) -> PathBuf {
    dir.join(format!("{}-docs-config.json", namespace))
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExportResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    let rendered = serde_json::to_string_pretty(value).map_err(|e| ExportError::parse(path, e))?;
    fs::write(path, rendered).map_err(|e| ExportError::io(path, e))
}

fn read_value(path: &Path) -> ExportResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ExportError::parse(path, e))
}

/// Export a data source descriptor; returns the written path
pub fn export_source(
    dir: &Path,
    namespace: &str,
    source: &DataSourceDescriptor,
) -> ExportResult<PathBuf> {
    let path = source_doc_path(dir, namespace);
    write_pretty(&path, source)?;
    Ok(path)
}

/// Export one table descriptor; returns the written path
pub fn export_table(dir: &Path, namespace: &str, table: &TableDescriptor) -> ExportResult<PathBuf> {
    let path = table_doc_path(dir, namespace, &table.name);
    write_pretty(&path, table)?;
    Ok(path)
}

/// Export a combined table set; returns the written path
pub fn export_table_set(
    dir: &Path,
    namespace: &str,
    tables: &[TableDescriptor],
) -> ExportResult<PathBuf> {
    let path = table_set_doc_path(dir, namespace);
    write_pretty(&path, tables)?;
    Ok(path)
}

/// Load a data source document back through its builder
pub fn load_source(path: &Path) -> ExportResult<DataSourceDescriptor> {
    let value = read_value(path)?;
    let mut builder = DataSourceBuilder::new();
    builder
        .populate(&value)
        .map(|b| b.finalize())
        .unwrap_or_else(Err)
        .map_err(|errors| ExportError::invalid(path, errors))
}

/// Load a single-table document back through its builder
pub fn load_table(path: &Path) -> ExportResult<TableDescriptor> {
    let value = read_value(path)?;
    table_from_value(path, &value)
}

/// Load a combined table-set document
pub fn load_table_set(path: &Path) -> ExportResult<Vec<TableDescriptor>> {
    let value = read_value(path)?;
    let entries = value.as_array().ok_or_else(|| {
        ExportError::invalid(
            path,
            crate::schema::SchemaError::type_mismatch("tables", "array", "value").into(),
        )
    })?;
    entries
        .iter()
        .map(|entry| table_from_value(path, entry))
        .collect()
}

fn table_from_value(path: &Path, value: &Value) -> ExportResult<TableDescriptor> {
    let mut builder = TableBuilder::new();
    builder
        .populate(value)
        .map(|b| b.finalize())
        .unwrap_or_else(Err)
        .map_err(|errors| ExportError::invalid(path, errors))
}

/// List exported documents under a directory, classified by file name
pub fn scan_docs(dir: &Path) -> ExportResult<Vec<(PathBuf, DocKind)>> {
    let entries = fs::read_dir(dir).map_err(|e| ExportError::io(dir, e))?;
    let mut docs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ExportError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(kind) = classify(file_name) {
            docs.push((path, kind));
        }
    }
    docs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(docs)
}

/// A data source together with its tables, keyed by table name order of
/// arrival. The document is the unit the whole session works toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub source: DataSourceDescriptor,
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl SourceDocument {
    pub fn new(source: DataSourceDescriptor) -> Self {
        Self {
            source,
            tables: Vec::new(),
        }
    }

    /// Add or replace a table by name
    pub fn add_table(&mut self, table: TableDescriptor) {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    /// Append a field to a table, creating the table when missing
    pub fn add_field(&mut self, table_name: &str, field: FieldDescriptor) {
        if let Some(table) = self.tables.iter_mut().find(|t| t.name == table_name) {
            table.fields.push(field);
        } else {
            self.tables.push(TableDescriptor {
                name: table_name.to_string(),
                fields: vec![field],
            });
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Export a whole source document; returns the written path
pub fn export_document(
    dir: &Path,
    namespace: &str,
    document: &SourceDocument,
) -> ExportResult<PathBuf> {
    let path = source_docs_path(dir, namespace);
    write_pretty(&path, document)?;
    Ok(path)
}

/// Load a whole source document back through the builders
pub fn load_document(path: &Path) -> ExportResult<SourceDocument> {
    let value = read_value(path)?;
    let source_value = value.get("source").cloned().unwrap_or(Value::Null);
    let mut builder = DataSourceBuilder::new();
    let source = builder
        .populate(&source_value)
        .map(|b| b.finalize())
        .unwrap_or_else(Err)
        .map_err(|errors| ExportError::invalid(path, errors))?;

    let mut document = SourceDocument::new(source);
    if let Some(tables) = value.get("tables").and_then(|t| t.as_array()) {
        for entry in tables {
            document.add_table(table_from_value(path, entry)?);
        }
    }
    Ok(document)
}
