//! Observability: structured logging for the interactive session

pub mod logger;

pub use logger::{Logger, Severity};
