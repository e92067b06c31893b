//! CLI command implementations
//!
//! The session drives the prompt/validate/re-prompt loop: every builder
//! attribute is collected once, finalize reports one error per offending
//! attribute, and exactly those attributes are re-collected until the
//! descriptor finalizes. Validation never happens here; the builders and
//! the engine own it.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::configurator::{
    lookup, parse_boolean, AttributeMeta, DataSourceBuilder, FieldBuilder, TableBuilder,
    FIELD_ATTRIBUTES, SOURCE_ATTRIBUTES, TABLE_ATTRIBUTES,
};
use crate::export::{self, DocKind};
use crate::observability::Logger;
use crate::schema::{DataSourceDescriptor, FieldDescriptor, SchemaError, TableDescriptor};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::prompt::Prompter;
use super::theme::Theme;
use super::view;

/// One interactive configuration session
pub struct Session {
    namespace: String,
    output: PathBuf,
    theme: Theme,
    logger: Logger,
    prompter: Prompter,
}

impl Session {
    pub fn new(namespace: String, output: PathBuf, theme: Theme, logger: Logger) -> CliResult<Self> {
        Ok(Self {
            namespace,
            output,
            theme,
            logger,
            prompter: Prompter::new()?,
        })
    }

    /// Run one CLI command to completion
    pub fn dispatch(&mut self, command: Command) -> CliResult<()> {
        match command {
            Command::ConfigureSource {
                name,
                kind,
                host,
                port,
                user,
                password,
            } => self.configure_source(name, kind, host, port, user, password),
            Command::ConfigureTable { table_name } => {
                self.configure_table(table_name, true).map(|_| ())
            }
            Command::ConfigureTables => self.configure_tables(),
            Command::Show { file } => self.show(&file),
            Command::Validate { file } => self.validate(&file),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn configure_source(
        &mut self,
        name: Option<String>,
        kind: Option<String>,
        host: Option<String>,
        port: Option<u64>,
        user: Option<String>,
        password: Option<String>,
    ) -> CliResult<()> {
        println!("{}", self.theme.h1("Configure data source"));
        self.logger
            .info("CONFIGURE_SOURCE", &[("namespace", &self.namespace)]);

        let mut builder = DataSourceBuilder::new();
        if let Some(name) = name {
            builder.set_name(name);
        }
        if let Some(kind) = kind {
            builder.set_kind(kind);
        }
        if let Some(host) = host {
            builder.set_host(host);
        }
        if let Some(port) = port {
            builder.set_port(port);
        }
        if let Some(user) = user {
            builder.set_user(user);
        }
        if let Some(password) = password {
            builder.set_password(password);
        }

        for meta in SOURCE_ATTRIBUTES {
            if builder.is_unset(meta.attribute) {
                self.collect_source_attribute(&mut builder, meta)?;
            }
        }

        let source = self.finalize_source(&mut builder)?;
        let path = export::export_source(&self.output, &self.namespace, &source)?;
        self.logger
            .info("EXPORT_SOURCE", &[("path", &path.display().to_string())]);
        println!("{}", view::source_table(&source));
        Ok(())
    }

    fn configure_table(
        &mut self,
        table_name: Option<String>,
        export_file: bool,
    ) -> CliResult<TableDescriptor> {
        println!("{}", self.theme.h1("Configure table"));

        let mut builder = TableBuilder::new();
        match table_name {
            Some(name) => {
                builder.set_name(name);
            }
            None => self.collect_table_name(&mut builder)?,
        }

        let mut configured: Vec<String> = Vec::new();
        loop {
            let question = if configured.is_empty() {
                "Add a field? (y/n) "
            } else {
                "Add another field? (y/n) "
            };
            let question = self.theme.normal(question);
            if !self.prompter.confirm(&question, true)? {
                break;
            }
            let field = self.configure_field()?;
            configured.push(field.name.clone());
            builder.add_field(field);
            println!(
                "{}",
                self.theme
                    .info(&format!("Configured fields: {}", configured.join(", ")))
            );
        }

        let table = self.finalize_table(&mut builder)?;
        if export_file {
            let path = export::export_table(&self.output, &self.namespace, &table)?;
            self.logger.info(
                "EXPORT_TABLE",
                &[
                    ("path", path.display().to_string().as_str()),
                    ("table", table.name.as_str()),
                ],
            );
        }
        println!("{}", view::fields_table(&table));
        Ok(table)
    }

    fn configure_tables(&mut self) -> CliResult<()> {
        println!("{}", self.theme.h1("Configure tables"));

        let mut tables: Vec<TableDescriptor> = Vec::new();
        loop {
            let table = self.configure_table(None, false)?;
            tables.push(table);
            let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
            println!(
                "{}",
                self.theme
                    .info(&format!("Configured tables: {}", names.join(", ")))
            );
            let question = self.theme.normal("Add another table? (y/n) ");
            if !self.prompter.confirm(&question, true)? {
                break;
            }
        }

        let path = export::export_table_set(&self.output, &self.namespace, &tables)?;
        self.logger.info(
            "EXPORT_TABLE_SET",
            &[
                ("path", path.display().to_string().as_str()),
                ("tables", tables.len().to_string().as_str()),
            ],
        );
        Ok(())
    }

    fn show(&mut self, file: &Path) -> CliResult<()> {
        match self.load_kind(file)? {
            DocKind::Source => {
                let source = export::load_source(file)?;
                println!("{}", view::source_table(&source));
            }
            DocKind::Table => {
                let table = export::load_table(file)?;
                println!("{}", self.theme.h2(&table.name));
                println!("{}", view::fields_table(&table));
            }
            DocKind::TableSet => {
                for table in export::load_table_set(file)? {
                    println!("{}", self.theme.h2(&table.name));
                    println!("{}", view::fields_table(&table));
                }
            }
            DocKind::Document => {
                let document = export::load_document(file)?;
                println!("{}", view::source_table(&document.source));
                for table in &document.tables {
                    println!("{}", self.theme.h2(&table.name));
                    println!("{}", view::fields_table(table));
                }
            }
        }
        Ok(())
    }

    fn validate(&mut self, file: &Path) -> CliResult<()> {
        let kind = self.load_kind(file)?;
        let outcome = match kind {
            DocKind::Source => export::load_source(file).map(|_| ()),
            DocKind::Table => export::load_table(file).map(|_| ()),
            DocKind::TableSet => export::load_table_set(file).map(|_| ()),
            DocKind::Document => export::load_document(file).map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                self.logger
                    .info("DOCUMENT_VALID", &[("path", &file.display().to_string())]);
                println!(
                    "{}",
                    self.theme
                        .info(&format!("{} is valid", file.display()))
                );
                Ok(())
            }
            Err(export::ExportError::Invalid { errors, .. }) => {
                for schema_err in errors.iter() {
                    self.report_schema_error(schema_err);
                }
                Err(CliError::DocumentInvalid {
                    count: errors.len(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn load_kind(&self, file: &Path) -> CliResult<DocKind> {
        file.file_name()
            .and_then(|n| n.to_str())
            .and_then(export::classify)
            .ok_or_else(|| CliError::UnknownDocument {
                path: file.display().to_string(),
            })
    }

    /// Prompt one field through every attribute, then finalize with
    /// targeted re-prompts until it validates
    fn configure_field(&mut self) -> CliResult<FieldDescriptor> {
        println!("{}", self.theme.h2("Configure field"));

        let mut builder = FieldBuilder::new();
        for meta in FIELD_ATTRIBUTES {
            if builder.is_unset(meta.attribute) {
                self.collect_field_attribute(&mut builder, meta)?;
            }
        }

        loop {
            let errors = match builder.finalize() {
                Ok(field) => return Ok(field),
                Err(errors) => errors,
            };
            self.logger
                .warn("FIELD_INVALID", &[("errors", &errors.len().to_string())]);
            for err in errors.iter() {
                self.report_schema_error(err);
                if let Some(meta) = lookup(FIELD_ATTRIBUTES, err.attribute()) {
                    self.collect_field_attribute(&mut builder, meta)?;
                }
            }
        }
    }

    fn finalize_source(
        &mut self,
        builder: &mut DataSourceBuilder,
    ) -> CliResult<DataSourceDescriptor> {
        loop {
            let errors = match builder.finalize() {
                Ok(source) => return Ok(source),
                Err(errors) => errors,
            };
            self.logger
                .warn("SOURCE_INVALID", &[("errors", &errors.len().to_string())]);
            for err in errors.iter() {
                self.report_schema_error(err);
                if let Some(meta) = lookup(SOURCE_ATTRIBUTES, err.attribute()) {
                    self.collect_source_attribute(builder, meta)?;
                }
            }
        }
    }

    fn finalize_table(&mut self, builder: &mut TableBuilder) -> CliResult<TableDescriptor> {
        loop {
            let errors = match builder.finalize() {
                Ok(table) => return Ok(table),
                Err(errors) => errors,
            };
            self.logger
                .warn("TABLE_INVALID", &[("errors", &errors.len().to_string())]);
            for err in errors.iter() {
                self.report_schema_error(err);
            }
            self.collect_table_name(builder)?;
        }
    }

    fn collect_source_attribute(
        &mut self,
        builder: &mut DataSourceBuilder,
        meta: &AttributeMeta,
    ) -> CliResult<()> {
        loop {
            let Some(raw) = self.prompt_attribute(meta)? else {
                return Ok(());
            };
            match apply_source_attribute(builder, meta.attribute, &raw) {
                Ok(()) => return Ok(()),
                Err(err) => self.report_schema_error(&err),
            }
        }
    }

    fn collect_field_attribute(
        &mut self,
        builder: &mut FieldBuilder,
        meta: &AttributeMeta,
    ) -> CliResult<()> {
        loop {
            let Some(raw) = self.prompt_attribute(meta)? else {
                return Ok(());
            };
            match apply_field_attribute(builder, meta.attribute, &raw) {
                Ok(()) => return Ok(()),
                Err(err) => self.report_schema_error(&err),
            }
        }
    }

    fn collect_table_name(&mut self, builder: &mut TableBuilder) -> CliResult<()> {
        let Some(meta) = lookup(TABLE_ATTRIBUTES, "name") else {
            return Ok(());
        };
        if let Some(raw) = self.prompt_attribute(meta)? {
            builder.set_name(raw);
        }
        Ok(())
    }

    /// Render the hint line and read one value; empty input leaves the
    /// attribute unset
    fn prompt_attribute(&mut self, meta: &AttributeMeta) -> CliResult<Option<String>> {
        println!("{}", self.theme.h3(&meta.prompt_hint()));
        let prompt = self.theme.normal(&format!("{}: ", meta.label));
        if meta.hidden {
            self.prompter.read_sensitive(&prompt)
        } else {
            self.prompter.read_line(&prompt)
        }
    }

    fn report_schema_error(&self, err: &SchemaError) {
        self.logger.error(
            "VALIDATION_FAILED",
            &[
                ("attribute", err.attribute()),
                ("code", err.code().code()),
            ],
        );
        println!("{}", self.theme.error(&err.to_string()));
    }
}

/// Apply one raw prompt value to a data source builder
fn apply_source_attribute(
    builder: &mut DataSourceBuilder,
    attribute: &str,
    raw: &str,
) -> Result<(), SchemaError> {
    match attribute {
        "name" => {
            builder.set_name(raw);
        }
        "kind" => {
            builder.set_kind(raw);
        }
        "host" => {
            builder.set_host(raw);
        }
        "port" => {
            let port: u64 = raw
                .parse()
                .map_err(|_| SchemaError::type_mismatch("port", "integer", raw))?;
            builder.set_port(port);
        }
        "user" => {
            builder.set_user(raw);
        }
        "password" => {
            builder.set_password(raw);
        }
        _ => {}
    }
    Ok(())
}

/// Apply one raw prompt value to a field builder
fn apply_field_attribute(
    builder: &mut FieldBuilder,
    attribute: &str,
    raw: &str,
) -> Result<(), SchemaError> {
    match attribute {
        "name" => {
            builder.set_name(raw);
        }
        "type" => {
            builder.set_type(raw);
        }
        "alias" => {
            builder.set_alias(raw);
        }
        "factory" => {
            builder.set_factory(raw);
        }
        "pattern" => {
            builder.set_pattern(raw);
        }
        "required" | "unique" => {
            let flag = parse_boolean(attribute, &Value::String(raw.to_string()))?;
            if attribute == "required" {
                builder.set_required(flag);
            } else {
                builder.set_unique(flag);
            }
        }
        "min_length" | "max_length" => {
            let length: usize = raw
                .parse()
                .map_err(|_| SchemaError::type_mismatch(attribute, "integer", raw))?;
            if attribute == "min_length" {
                builder.set_min_length(length);
            } else {
                builder.set_max_length(length);
            }
        }
        "gt" | "ge" | "lt" | "le" => {
            let bound: f64 = raw
                .parse()
                .map_err(|_| SchemaError::type_mismatch(attribute, "number", raw))?;
            match attribute {
                "gt" => builder.set_gt(bound),
                "ge" => builder.set_ge(bound),
                "lt" => builder.set_lt(bound),
                _ => builder.set_le(bound),
            };
        }
        "decimal_places" => {
            let places: u8 = raw
                .parse()
                .map_err(|_| SchemaError::type_mismatch(attribute, "integer", raw))?;
            builder.set_decimal_places(places);
        }
        "default_value" => {
            let value = coerce_default(builder.type_tag(), raw)?;
            builder.set_default_value(value);
        }
        _ => {}
    }
    Ok(())
}

/// Interpret a raw default value according to the declared type tag.
///
/// Datetime accepts either an integer timestamp or a string the engine
/// will parse as RFC 3339; everything unrecognized stays a string and
/// the engine rules on it.
fn coerce_default(type_tag: Option<&str>, raw: &str) -> Result<Value, SchemaError> {
    match type_tag.unwrap_or("text") {
        "integer" => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| SchemaError::type_mismatch("default_value", "integer", raw)),
        "float" => raw
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| SchemaError::type_mismatch("default_value", "float", raw)),
        "boolean" => {
            parse_boolean("default_value", &Value::String(raw.to_string())).map(Value::from)
        }
        "datetime" => Ok(raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(raw))),
        _ => Ok(Value::from(raw)),
    }
}
