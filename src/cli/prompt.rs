//! Line-editing prompt wrapper
//!
//! Wraps a rustyline editor. Empty input means "leave unset"; Ctrl-C and
//! Ctrl-D abort the session cleanly.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::errors::{CliError, CliResult};

/// Interactive input source for the session
pub struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub fn new() -> CliResult<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Read one trimmed line; `None` when the operator submitted nothing
    pub fn read_line(&mut self, prompt: &str) -> CliResult<Option<String>> {
        let value = self.read_raw(prompt)?;
        if let Some(value) = &value {
            let _ = self.editor.add_history_entry(value);
        }
        Ok(value)
    }

    /// Read a sensitive value; never recorded in the editor history
    pub fn read_sensitive(&mut self, prompt: &str) -> CliResult<Option<String>> {
        self.read_raw(prompt)
    }

    fn read_raw(&mut self, prompt: &str) -> CliResult<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(CliError::Aborted),
            Err(err) => Err(err.into()),
        }
    }

    /// Yes/no question; empty input takes the default
    pub fn confirm(&mut self, prompt: &str, default_yes: bool) -> CliResult<bool> {
        loop {
            match self.read_line(prompt)? {
                None => return Ok(default_yes),
                Some(answer) => match answer.to_ascii_lowercase().as_str() {
                    "y" | "yes" => return Ok(true),
                    "n" | "no" => return Ok(false),
                    _ => continue,
                },
            }
        }
    }
}
