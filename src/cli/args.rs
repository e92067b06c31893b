//! CLI argument definitions using clap
//!
//! Commands:
//! - schemadoc configure-source [--name ... --kind ... --host ...]
//! - schemadoc configure-table [--table-name <name>]
//! - schemadoc configure-tables
//! - schemadoc show <file>
//! - schemadoc validate <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemadoc - An interactive, strict data source schema configurator
#[derive(Parser, Debug)]
#[command(name = "schemadoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Namespace prefixed to exported file names
    #[arg(long, global = true, default_value = "default")]
    pub namespace: String,

    /// Directory exported documents are written to
    #[arg(long, global = true, default_value = "./docs-out")]
    pub output: PathBuf,

    /// Log warnings and errors only
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configure a data source interactively and export it
    ConfigureSource {
        /// Data source name
        #[arg(long)]
        name: Option<String>,

        /// Data source kind
        #[arg(long)]
        kind: Option<String>,

        /// Data source host
        #[arg(long)]
        host: Option<String>,

        /// Data source port
        #[arg(long)]
        port: Option<u64>,

        /// Data source user
        #[arg(long)]
        user: Option<String>,

        /// Data source password
        #[arg(long)]
        password: Option<String>,
    },

    /// Configure one table and its fields, then export it
    ConfigureTable {
        /// Table name (prompted when omitted)
        #[arg(long)]
        table_name: Option<String>,
    },

    /// Configure several tables and export the combined set
    ConfigureTables,

    /// Render an exported document
    Show {
        /// Path to an exported document
        file: PathBuf,
    },

    /// Re-validate an exported document
    Validate {
        /// Path to an exported document
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
