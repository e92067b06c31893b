//! CLI-specific error types

use thiserror::Error;

use crate::export::ExportError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors terminating a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    /// stdin/stdout failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The line editor failed
    #[error("prompt error: {0}")]
    Prompt(#[from] rustyline::error::ReadlineError),

    /// Persistence failure
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The operator interrupted the session (Ctrl-C / Ctrl-D)
    #[error("configuration aborted")]
    Aborted,

    /// A validate run found errors
    #[error("document failed validation with {count} error(s)")]
    DocumentInvalid { count: usize },

    /// File name does not match any known document shape
    #[error("unrecognized document '{path}'")]
    UnknownDocument { path: String },
}
