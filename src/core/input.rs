//! Key model, editor commands and the key map that ties them together
//!
//! Bindings are written as strings in the configuration (`"^S"`, `"C-SPC"`,
//! `"PageUp"`) and parsed with [`Key::from_str`]; command names parse with
//! [`Command::from_str`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::Config;

/// One decoded key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Esc,
    Enter,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Null,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Ctrl(' ') => write!(f, "C-SPC"),
            Key::Ctrl(c) => write!(f, "C-{}", c),
            Key::Esc => write!(f, "ESC"),
            Key::Enter => write!(f, "RET"),
            Key::Backspace => write!(f, "BS"),
            Key::Tab => write!(f, "TAB"),
            Key::Delete => write!(f, "DEL"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::PageUp => write!(f, "PgUp"),
            Key::PageDown => write!(f, "PgDn"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Null => write!(f, "NUL"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Ctrl notation: ^X, C-x, C-SPC, ^@
        let ctrl = s
            .strip_prefix('^')
            .or_else(|| s.strip_prefix("C-"))
            .filter(|rest| !rest.is_empty());
        if let Some(rest) = ctrl {
            return match rest {
                "@" | "SPC" | "Space" | " " => Ok(Key::Ctrl(' ')),
                _ => {
                    let mut chars = rest.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Key::Ctrl(c.to_ascii_lowercase())),
                        _ => Err(format!("Unknown key: {}", s)),
                    }
                }
            };
        }

        match s.to_ascii_uppercase().as_str() {
            "ENTER" | "RET" => Ok(Key::Enter),
            "TAB" => Ok(Key::Tab),
            "BACKSPACE" | "BS" => Ok(Key::Backspace),
            "ESC" => Ok(Key::Esc),
            "DELETE" | "DEL" => Ok(Key::Delete),
            "HOME" => Ok(Key::Home),
            "END" => Ok(Key::End),
            "PAGEUP" | "PGUP" => Ok(Key::PageUp),
            "PAGEDOWN" | "PGDN" => Ok(Key::PageDown),
            "UP" => Ok(Key::Up),
            "DOWN" => Ok(Key::Down),
            "LEFT" => Ok(Key::Left),
            "RIGHT" => Ok(Key::Right),
            "NUL" | "NULL" => Ok(Key::Null),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    // Raw characters keep their case
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(format!("Unknown key: {}", s)),
                }
            }
        }
    }
}

impl Key {
    /// Printable byte this key inserts when it is not bound to a command
    pub fn self_insert(&self) -> Option<Vec<u8>> {
        match self {
            Key::Char(c) if !c.is_control() => {
                let mut buf = [0u8; 4];
                Some(c.encode_utf8(&mut buf).as_bytes().to_vec())
            }
            _ => None,
        }
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Everything a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Quit,
    Save,
    SaveAs,
    Find,
    ToggleMark,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    NewBuffer,
    NextBuffer,
    CloseBuffer,
    OpenFile,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,
    Redraw,
}

const COMMAND_NAMES: &[(Command, &str)] = &[
    (Command::Quit, "quit"),
    (Command::Save, "save-buffer"),
    (Command::SaveAs, "write-file"),
    (Command::Find, "find"),
    (Command::ToggleMark, "toggle-mark"),
    (Command::Copy, "copy-region"),
    (Command::Cut, "cut-region"),
    (Command::Paste, "paste"),
    (Command::Undo, "undo"),
    (Command::Redo, "redo"),
    (Command::NewBuffer, "new-buffer"),
    (Command::NextBuffer, "next-buffer"),
    (Command::CloseBuffer, "close-buffer"),
    (Command::OpenFile, "open-file"),
    (Command::MoveLeft, "backward-character"),
    (Command::MoveRight, "forward-character"),
    (Command::MoveUp, "previous-line"),
    (Command::MoveDown, "next-line"),
    (Command::LineStart, "beginning-of-line"),
    (Command::LineEnd, "end-of-line"),
    (Command::PageUp, "backward-page"),
    (Command::PageDown, "forward-page"),
    (Command::InsertNewline, "insert-newline"),
    (Command::InsertTab, "insert-tab"),
    (Command::DeleteBackward, "delete-backward"),
    (Command::DeleteForward, "delete-forward"),
    (Command::Redraw, "redraw"),
];

impl Command {
    /// Name used in key bindings
    pub fn name(&self) -> &'static str {
        COMMAND_NAMES
            .iter()
            .find(|(command, _)| command == self)
            .map_or("", |(_, name)| name)
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        COMMAND_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(command, _)| *command)
            .ok_or_else(|| format!("Unknown command: {}", s))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// KEY MAP
// =============================================================================

/// Single-key bindings from key to command
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<Key, Command>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the configuration's binding table. Unparseable keys or
    /// command names are skipped with a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut map = Self::new();
        for (key, command) in &config.keybindings {
            match (key.parse::<Key>(), command.parse::<Command>()) {
                (Ok(key), Ok(command)) => map.bind(key, command),
                (Err(e), _) | (_, Err(e)) => log::warn!("ignoring binding {}: {}", key, e),
            }
        }
        map
    }

    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn lookup(&self, key: &Key) -> Option<Command> {
        self.bindings.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
