// Configuration module
// Internal representation of user configuration, the rc file reader and the
// typed settings view the editor runs with

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Name of the per-user configuration file in the home directory
pub const RC_FILE_NAME: &str = ".tabularc";

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub keybindings: HashMap<String, String>,
    pub settings: HashMap<String, ConfigValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Config {
    /// Bind a key sequence to a command
    pub fn bind(&mut self, key: &str, command: &str) {
        self.keybindings
            .insert(key.to_string(), command.to_string());
    }

    /// Set a configuration value
    pub fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) {
        self.settings.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.settings.get(key)
    }

    /// Integer view of a setting; booleans read as 0/1
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Int(i) => Some(*i),
            ConfigValue::Bool(b) => Some(i64::from(*b)),
            ConfigValue::String(_) => None,
        })
    }

    /// Boolean view of a setting; integers read as non-zero
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::Int(i) => Some(*i != 0),
            ConfigValue::String(_) => None,
        })
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    // ===== RC FILE =====

    /// `~/.tabularc`, when a home directory is known
    pub fn default_rc_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(RC_FILE_NAME))
    }

    /// Apply every line of an rc file. A missing file is not an error and
    /// returns `Ok(false)`.
    pub fn load_rc_file(&mut self, path: &Path) -> Result<bool> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(EditorError::io(path, e)),
        };
        for line in text.lines() {
            self.parse_line(line);
        }
        log::info!("loaded configuration from {}", path.display());
        Ok(true)
    }

    /// Apply one `key = value` line. `#` starts a comment; lines without `=`
    /// are ignored. `bind KEY = command` adds a key binding.
    pub fn parse_line(&mut self, line: &str) {
        let line = line.split('#').next().unwrap_or_default();
        let Some((key, value)) = line.split_once('=') else {
            return;
        };
        let key = key.trim();
        let value = value.trim();

        if let Some(binding) = key.strip_prefix("bind ") {
            self.bind(binding.trim(), value);
            return;
        }

        match key {
            "tab-stop" | "quit-times" | "soft-tabs" => self.set(key, leading_int(value)),
            "soft-wrap" | "hard-wrap" => match value {
                "true" | "on" | "yes" => self.set(key, true),
                "false" | "off" | "no" => self.set(key, false),
                _ => self.set(key, leading_int(value) != 0),
            },
            _ => log::debug!("ignoring unknown setting {:?}", key),
        }
    }

    /// Resolve the typed settings, falling back to defaults for missing or
    /// out-of-range values
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();

        let positive = |key: &str, default: usize| match self.get_int(key) {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(default),
            Some(n) => {
                log::warn!("{} = {} is not positive, using {}", key, n, default);
                default
            }
            None => default,
        };

        Settings {
            tab_stop: positive("tab-stop", defaults.tab_stop),
            quit_times: positive("quit-times", defaults.quit_times),
            soft_tabs: self
                .get_int("soft-tabs")
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(defaults.soft_tabs),
            soft_wrap: self.get_bool("soft-wrap").unwrap_or(defaults.soft_wrap),
            hard_wrap: self.get_bool("hard-wrap").unwrap_or(defaults.hard_wrap),
        }
    }
}

/// Integer at the start of `s` (optional sign, then digits); 0 when there is
/// none
fn leading_int(s: &str) -> i64 {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// Validated settings the editor runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Tab width, always positive
    pub tab_stop: usize,
    /// Consecutive quit/close presses needed to discard unsaved changes
    pub quit_times: usize,
    /// Non-zero turns soft tabs on; the tab key then inserts `tab_stop` spaces
    pub soft_tabs: usize,
    pub soft_wrap: bool,
    pub hard_wrap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            quit_times: 3,
            soft_tabs: 0,
            soft_wrap: false,
            hard_wrap: false,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}
