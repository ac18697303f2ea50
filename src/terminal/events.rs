//! Key decoding
//!
//! Maps crossterm events onto the editor's [`Key`] model and blocks until the
//! next key arrives, redrawing on resize and while idle so status messages
//! expire on screen.

use std::io::Write;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::app::EditorApp;
use crate::core::input::Key;
use crate::error::Result;
use crate::terminal::render;

/// How long to wait for input before redrawing anyway
const IDLE_REDRAW: Duration = Duration::from_millis(500);

/// Editor events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Key(Key),
    /// New terminal size as (columns, rows)
    Resize(u16, u16),
    None,
}

/// Translate one crossterm event
pub fn translate(event: Event) -> EditorEvent {
    match event {
        Event::Key(key_event) => match key_from_event(key_event) {
            Some(key) => EditorEvent::Key(key),
            None => EditorEvent::None,
        },
        Event::Resize(cols, rows) => EditorEvent::Resize(cols, rows),
        _ => EditorEvent::None,
    }
}

/// Normalize a key press. Releases are dropped; Ctrl+Space and Ctrl+@ both
/// become `Ctrl(' ')`.
pub fn key_from_event(key_event: KeyEvent) -> Option<Key> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    let key = match key_event.code {
        KeyCode::Char(c) if ctrl && !alt => match c {
            ' ' | '@' | '2' => Key::Ctrl(' '),
            c => Key::Ctrl(c.to_ascii_lowercase()),
        },
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Null => Key::Ctrl(' '),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };
    Some(key)
}

/// Block until a key is pressed
pub fn next_key(app: &mut EditorApp, out: &mut impl Write) -> Result<Key> {
    loop {
        if !event::poll(IDLE_REDRAW)? {
            render::refresh(app, out)?;
            continue;
        }
        match translate(event::read()?) {
            EditorEvent::Key(key) => return Ok(key),
            EditorEvent::Resize(cols, rows) => {
                app.resize(usize::from(rows), usize::from(cols));
                render::refresh(app, out)?;
            }
            EditorEvent::None => {}
        }
    }
}
