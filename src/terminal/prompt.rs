//! Interactive prompt on the message bar.

use std::io::Write;

use crate::core::app::{EditorApp, Flow};
use crate::core::prompt::{self, PromptRequest};
use crate::error::Result;
use crate::terminal::{events, render};

/// Ask for a line of input. The prompt text is shown as the status message
/// and the screen is redrawn before every key.
pub fn prompt(app: &mut EditorApp, request: PromptRequest, out: &mut impl Write) -> Result<Flow> {
    prompt::run_prompt(app, request, |app, label| {
        app.set_status(label);
        render::refresh(app, out)?;
        events::next_key(app, out)
    })
}
