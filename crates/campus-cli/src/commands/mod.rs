pub mod admin;
pub mod auth;
pub mod chat;
pub mod notifications;
pub mod requests;
pub mod scholarship;

use anyhow::{Result, bail};
use rustyline::completion::Completer;
use rustyline::config::{ColorMode, Configurer};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{DefaultEditor, Editor, Helper};
use std::borrow::Cow::{self, Owned};

/// Line editor for interactive input, with history across calls.
pub(crate) struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    /// Reads one line. `None` when the user presses Ctrl-C or Ctrl-D.
    pub(crate) fn line(&mut self, label: &str) -> Result<Option<String>> {
        match self.editor.readline(label) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads a single answer; aborting the input is an error.
pub(crate) fn prompt(label: &str) -> Result<String> {
    match Prompter::new()?.line(label)? {
        Some(line) => Ok(line),
        None => bail!("Input cancelled"),
    }
}

/// Renders every typed character as `*`.
struct MaskingHelper;

impl Helper for MaskingHelper {}

impl Completer for MaskingHelper {
    type Candidate = String;
}

impl Hinter for MaskingHelper {
    type Hint = String;
}

impl Validator for MaskingHelper {}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Owned("*".repeat(line.chars().count()))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Reads a secret without echoing it or keeping it in history.
pub(crate) fn prompt_secret(label: &str) -> Result<String> {
    let mut editor = Editor::new()?;
    editor.set_helper(Some(MaskingHelper));
    // Masking is done by the highlighter, which only runs with colors on.
    editor.set_color_mode(ColorMode::Forced);
    editor.set_auto_add_history(false);

    match editor.readline(label) {
        Ok(secret) => Ok(secret),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => bail!("Input cancelled"),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masking_hides_every_character() {
        let helper = MaskingHelper;
        assert_eq!(helper.highlight("hunter2", 7), "*******");
        assert_eq!(helper.highlight("pässwörd", 0), "********");
        assert!(helper.highlight_char("x", 1, false));
    }
}
