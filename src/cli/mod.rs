//! CLI module for schemadoc
//!
//! Provides the command-line interface:
//! - configure-source: interactive data source configuration
//! - configure-table / configure-tables: interactive table configuration
//! - show: render an exported document
//! - validate: re-validate an exported document
//!
//! `run` owns the theme and the logger and threads them through the
//! session; nothing here keeps global state.

mod args;
mod commands;
mod errors;
mod prompt;
mod theme;
mod view;

pub use args::{Cli, Command};
pub use commands::Session;
pub use errors::{CliError, CliResult};
pub use prompt::Prompter;
pub use theme::Theme;

use crate::observability::{Logger, Severity};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let min_severity = if cli.quiet {
        Severity::Warn
    } else {
        Severity::Info
    };
    let logger = Logger::new("schemadoc", min_severity);
    let theme = Theme::colored();

    let mut session = Session::new(cli.namespace, cli.output, theme, logger)?;
    session.dispatch(cli.command)
}
