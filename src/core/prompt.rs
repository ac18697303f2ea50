//! Shared prompt handling
//!
//! The one-line input used for save-as, find, open-file and the unsaved
//! changes question. Key decoding and drawing stay with the caller, which
//! hands keys in through a closure; everything else happens here so the same
//! loop serves the terminal and the tests.

use crate::core::app::{EditorApp, Flow};
use crate::core::input::Key;
use crate::error::Result;

/// Interactions that need a line of input from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRequest {
    SaveAs,
    Find,
    OpenFile,
    /// A new buffer was requested while the current one has unsaved changes
    UnsavedNewBuffer,
}

impl PromptRequest {
    /// Prompt text with the input typed so far
    pub fn label(&self, input: &str) -> String {
        match self {
            PromptRequest::SaveAs => format!("Save as: {} (ESC to cancel)", input),
            PromptRequest::Find => format!("Search: {} (Use ESC/Arrows/Enter)", input),
            PromptRequest::OpenFile => format!("Open file: {} (ESC to cancel)", input),
            PromptRequest::UnsavedNewBuffer => format!(
                "Unsaved changes! (s)ave, (d)iscard or ESC to cancel: {}",
                input
            ),
        }
    }
}

/// Outcome of feeding one key to a [`LineInput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    Continue,
    Submit(String),
    Cancel,
}

/// Editable single line
#[derive(Debug, Clone, Default)]
pub struct LineInput {
    text: String,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Backspace/Delete remove the last character, Esc cancels, Enter submits
    /// a non-empty line and printable ASCII is appended. Anything else leaves
    /// the line as it is.
    pub fn handle(&mut self, key: &Key) -> PromptStep {
        match key {
            Key::Backspace | Key::Delete | Key::Ctrl('h') => {
                self.text.pop();
            }
            Key::Esc => return PromptStep::Cancel,
            Key::Enter if !self.text.is_empty() => {
                return PromptStep::Submit(self.text.clone());
            }
            Key::Char(c) if c.is_ascii() && !c.is_ascii_control() => self.text.push(*c),
            _ => {}
        }
        PromptStep::Continue
    }
}

/// Run a prompt to completion.
///
/// `next_key` is called with the current prompt text and must return the next
/// key; it is where the caller redraws the screen. Every key is also shown to
/// the app (incremental search moves on each one) before the answer is
/// handed to [`EditorApp::finish_prompt`].
pub fn run_prompt<F>(app: &mut EditorApp, request: PromptRequest, mut next_key: F) -> Result<Flow>
where
    F: FnMut(&mut EditorApp, &str) -> Result<Key>,
{
    let mut input = LineInput::new();
    loop {
        let label = request.label(input.text());
        let key = next_key(app, &label)?;
        let step = input.handle(&key);
        app.prompt_key(request, input.text(), &key);

        match step {
            PromptStep::Continue => {}
            PromptStep::Submit(answer) => return Ok(app.finish_prompt(request, Some(answer))),
            PromptStep::Cancel => return Ok(app.finish_prompt(request, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_input_editing() {
        let mut input = LineInput::new();
        assert_eq!(input.handle(&Key::Char('a')), PromptStep::Continue);
        assert_eq!(input.handle(&Key::Char('b')), PromptStep::Continue);
        assert_eq!(input.handle(&Key::Backspace), PromptStep::Continue);
        assert_eq!(input.text(), "a");
        assert_eq!(input.handle(&Key::Char('\u{1}')), PromptStep::Continue);
        assert_eq!(input.handle(&Key::Char('é')), PromptStep::Continue);
        assert_eq!(input.text(), "a");
        assert_eq!(input.handle(&Key::Enter), PromptStep::Submit("a".to_string()));
    }

    #[test]
    fn test_empty_enter_does_not_submit() {
        let mut input = LineInput::new();
        assert_eq!(input.handle(&Key::Enter), PromptStep::Continue);
        assert_eq!(input.handle(&Key::Esc), PromptStep::Cancel);
    }

    #[test]
    fn test_labels_show_input() {
        assert_eq!(
            PromptRequest::SaveAs.label("x.c"),
            "Save as: x.c (ESC to cancel)"
        );
        assert!(PromptRequest::Find.label("foo").starts_with("Search: foo"));
    }
}
