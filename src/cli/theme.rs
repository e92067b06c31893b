//! Terminal theme
//!
//! A value constructed once in `cli::run` and passed by reference to
//! whatever renders text. No process-global styling state.

use colored::Colorize;

/// Styling for the interactive session
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    /// Styled output for terminals
    pub fn colored() -> Self {
        Self { colored: true }
    }

    /// Unstyled output for pipes and tests
    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Section headings
    pub fn h1(&self, text: &str) -> String {
        if self.colored {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Sub-headings (validation messages)
    pub fn h2(&self, text: &str) -> String {
        if self.colored {
            text.magenta().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Prompt hints
    pub fn h3(&self, text: &str) -> String {
        if self.colored {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Regular prompt text
    pub fn normal(&self, text: &str) -> String {
        if self.colored {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Informational notices
    pub fn info(&self, text: &str) -> String {
        if self.colored {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Recoverable problems
    pub fn warn(&self, text: &str) -> String {
        if self.colored {
            text.yellow().italic().to_string()
        } else {
            text.to_string()
        }
    }

    /// Failures
    pub fn error(&self, text: &str) -> String {
        if self.colored {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
