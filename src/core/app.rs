//! This module defines the central `EditorApp` structure, which owns every
//! open buffer together with the editor-wide state: settings, key bindings,
//! screen size, the status message and the unsaved-changes confirmation
//! counter.
//!
//! Terminal code feeds it decoded keys through [`EditorApp::process_key`] and
//! reacts to the returned [`Flow`]; nothing in here touches the terminal.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::core::buffer::Buffer;
use crate::core::cursor::{Direction, Viewport};
use crate::core::input::{Command, Key, KeyMap};
use crate::core::prompt::PromptRequest;
use crate::core::search::SearchState;
use crate::error::EditorError;

/// How long a status message stays on screen
pub const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// What the caller should do after a key has been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Ask the user for a line of input, then hand it to
    /// [`EditorApp::finish_prompt`]
    Prompt(PromptRequest),
}

// =============================================================================
// BUFFER MANAGER
// =============================================================================

/// Result of [`BufferManager::close_current`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The buffer was removed and another one is current
    Closed,
    /// The current buffer has unsaved changes and was kept
    Unsaved,
    /// It was the only buffer; the editor should exit
    LastBuffer,
}

/// Ordered collection of open buffers with one of them current. There is
/// always at least one buffer.
#[derive(Debug, Clone)]
pub struct BufferManager {
    buffers: Vec<Buffer>,
    current: usize,
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new(Buffer::new())
    }
}

impl BufferManager {
    pub fn new(first: Buffer) -> Self {
        Self {
            buffers: vec![first],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Index of the current buffer
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Buffer> {
        self.buffers.iter_mut()
    }

    pub fn any_dirty(&self) -> bool {
        self.buffers.iter().any(Buffer::is_dirty)
    }

    /// Append a buffer and make it current
    pub fn new_buffer(&mut self, buffer: Buffer) {
        self.buffers.push(buffer);
        self.current = self.buffers.len() - 1;
    }

    /// Make the next buffer current, wrapping around
    pub fn switch_next(&mut self) {
        self.current = (self.current + 1) % self.buffers.len();
    }

    /// Put `buffer` in place of the current one
    pub fn replace_current(&mut self, buffer: Buffer) {
        self.buffers[self.current] = buffer;
    }

    /// Close the current buffer. Unless `force` is set a dirty buffer is kept
    /// and [`CloseOutcome::Unsaved`] is returned. The last buffer is never
    /// removed.
    pub fn close_current(&mut self, force: bool) -> CloseOutcome {
        if !force && self.current().is_dirty() {
            return CloseOutcome::Unsaved;
        }
        if self.buffers.len() == 1 {
            return CloseOutcome::LastBuffer;
        }
        self.buffers.remove(self.current);
        if self.current >= self.buffers.len() {
            self.current = self.buffers.len() - 1;
        }
        CloseOutcome::Closed
    }
}

// =============================================================================
// EDITOR APP
// =============================================================================

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    time: Instant,
}

/// EditorApp: the root application state
#[derive(Debug)]
pub struct EditorApp {
    pub buffers: BufferManager,
    pub settings: Settings,
    pub keymap: KeyMap,
    /// Text area size; rows exclude the status and message bars
    pub viewport: Viewport,
    status: Option<StatusMessage>,
    /// Presses of quit/close still needed before unsaved changes are dropped
    quit_times_left: usize,
    search: Option<SearchState>,
}

impl EditorApp {
    pub fn new(settings: Settings, keymap: KeyMap) -> Self {
        Self {
            buffers: BufferManager::new(Buffer::with_settings(&settings)),
            settings,
            keymap,
            viewport: Viewport::new(24, 80),
            status: None,
            quit_times_left: settings.quit_times,
            search: None,
        }
    }

    /// Open every file named on the command line, in order; the first one
    /// ends up current
    pub fn initialize(&mut self, files: &[PathBuf]) {
        for file in files {
            self.open_file(file);
        }
        if self.buffers.len() > 1 {
            while self.buffers.index() != 0 {
                self.buffers.switch_next();
            }
        }
        self.sync_layout();
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffers.current()
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffers.current_mut()
    }

    // ===== SCREEN =====

    /// Adopt a new screen size. Two rows go to the status and message bars.
    pub fn resize(&mut self, screen_rows: usize, screen_cols: usize) {
        self.viewport = Viewport::new(screen_rows.saturating_sub(2), screen_cols);
        log::debug!("resized to {}x{}", screen_cols, screen_rows);
        self.sync_layout();
    }

    /// Push the hard-wrap width and tab settings down into every buffer
    fn sync_layout(&mut self) {
        let width = self.settings.hard_wrap.then(|| self.viewport.text_width());
        let settings = self.settings;
        for buffer in self.buffers.iter_mut() {
            buffer.apply_settings(&settings);
            buffer.wrap_width = width;
        }
    }

    /// Keep the cursor of the current buffer on screen
    pub fn scroll(&mut self) {
        let viewport = self.viewport;
        let soft_wrap = self.settings.soft_wrap;
        self.buffer_mut().scroll(viewport, soft_wrap);
    }

    // ===== STATUS =====

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            time: Instant::now(),
        });
    }

    /// The status message, while it is still fresh
    pub fn status_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| s.time.elapsed() < STATUS_TIMEOUT)
            .map(|s| s.text.as_str())
    }

    /// Left and right halves of the status bar
    pub fn status_bar(&self) -> (String, String) {
        let buffer = self.buffer();
        let name: String = buffer.display_name().chars().take(20).collect();
        let left = format!(
            "{} - {} lines {}",
            name,
            buffer.numrows(),
            if buffer.is_dirty() { "(modified)" } else { "" }
        );

        let filetype = buffer.syntax.map_or("no ft", |s| s.filetype);
        let position = format!("{}/{}", buffer.cy + 1, buffer.numrows());
        let right = if self.buffers.len() > 1 {
            format!(
                "{} | [{}/{}] {}",
                filetype,
                self.buffers.index() + 1,
                self.buffers.len(),
                position
            )
        } else {
            format!("{} | {}", filetype, position)
        };
        (left, right)
    }

    // ===== KEY DISPATCH =====

    /// Handle one key outside of a prompt
    pub fn process_key(&mut self, key: Key) -> Flow {
        let command = self.keymap.lookup(&key);
        log::trace!("key {} -> {:?}", key, command);

        match command {
            Some(Command::Quit) => return self.request_quit(&key),
            Some(Command::CloseBuffer) => return self.request_close(&key),
            _ => {}
        }
        self.quit_times_left = self.settings.quit_times;

        match command {
            Some(command) => self.execute(command),
            None => {
                if let Some(bytes) = key.self_insert() {
                    let buffer = self.buffer_mut();
                    for byte in bytes {
                        buffer.insert_char(byte);
                    }
                }
                Flow::Continue
            }
        }
    }

    fn execute(&mut self, command: Command) -> Flow {
        let viewport = self.viewport;
        let buffer = self.buffers.current_mut();

        match command {
            Command::Quit | Command::CloseBuffer | Command::Redraw => {}

            // ----- Files & buffers -----
            Command::Save => {
                if buffer.filename.is_none() {
                    return Flow::Prompt(PromptRequest::SaveAs);
                }
                self.save();
            }
            Command::SaveAs => return Flow::Prompt(PromptRequest::SaveAs),
            Command::OpenFile => return Flow::Prompt(PromptRequest::OpenFile),
            Command::NewBuffer => {
                if buffer.is_dirty() {
                    return Flow::Prompt(PromptRequest::UnsavedNewBuffer);
                }
                self.create_buffer();
            }
            Command::NextBuffer => {
                self.buffers.switch_next();
                self.announce_buffer();
            }

            // ----- Search -----
            Command::Find => {
                self.search = Some(SearchState::begin(buffer));
                return Flow::Prompt(PromptRequest::Find);
            }

            // ----- Selection & clipboard -----
            Command::ToggleMark => {
                if buffer.toggle_mark() {
                    self.set_status(
                        "Selection mark set. Move cursor to select. Ctrl+Space to cancel.",
                    );
                } else {
                    self.set_status("Selection cancelled.");
                }
            }
            Command::Copy => {
                if let Some(n) = buffer.copy() {
                    buffer.selection_active = false;
                    self.set_status(format!("{} bytes copied to clipboard.", n));
                }
            }
            Command::Cut => {
                if let Some(n) = buffer.cut() {
                    self.set_status(format!("{} bytes cut to clipboard.", n));
                }
            }
            Command::Paste => buffer.paste(),

            // ----- History -----
            Command::Undo => {
                if !buffer.undo() {
                    self.set_status("Nothing to undo.");
                }
            }
            Command::Redo => {
                if !buffer.redo() {
                    self.set_status("Nothing to redo.");
                }
            }

            // ----- Movement -----
            Command::MoveLeft => buffer.move_cursor(Direction::Left),
            Command::MoveRight => buffer.move_cursor(Direction::Right),
            Command::MoveUp => buffer.move_cursor(Direction::Up),
            Command::MoveDown => buffer.move_cursor(Direction::Down),
            Command::LineStart => buffer.move_home(),
            Command::LineEnd => buffer.move_end(),
            Command::PageUp => buffer.page(Direction::Up, viewport),
            Command::PageDown => buffer.page(Direction::Down, viewport),

            // ----- Editing -----
            Command::InsertNewline => buffer.insert_newline(),
            Command::InsertTab => buffer.insert_tab(),
            Command::DeleteBackward => buffer.delete_char(),
            Command::DeleteForward => {
                let before = buffer.cursor();
                buffer.move_cursor(Direction::Right);
                if buffer.cursor() != before {
                    buffer.delete_char();
                }
            }
        }
        Flow::Continue
    }

    /// Quit, or count down the confirmation while any buffer is dirty
    fn request_quit(&mut self, key: &Key) -> Flow {
        if self.buffers.any_dirty() && self.quit_times_left > 0 {
            self.set_status(format!(
                "WARNING!!! File has unsaved changes. Press {} {} more times to quit.",
                key, self.quit_times_left
            ));
            self.quit_times_left -= 1;
            return Flow::Continue;
        }
        log::info!("quit");
        Flow::Quit
    }

    /// Close the current buffer, sharing the quit countdown when it is dirty
    fn request_close(&mut self, key: &Key) -> Flow {
        if self.buffer().is_dirty() && self.quit_times_left > 0 {
            self.set_status(format!(
                "WARNING!!! Buffer has unsaved changes. Press {} {} more times to close.",
                key, self.quit_times_left
            ));
            self.quit_times_left -= 1;
            return Flow::Continue;
        }
        self.quit_times_left = self.settings.quit_times;

        let name = self.buffer().display_name();
        match self.buffers.close_current(true) {
            CloseOutcome::LastBuffer => {
                log::info!("closed last buffer {}", name);
                Flow::Quit
            }
            _ => {
                log::info!("closed buffer {}", name);
                self.announce_buffer();
                Flow::Continue
            }
        }
    }

    fn announce_buffer(&mut self) {
        let text = format!(
            "Buffer {}/{}: {}",
            self.buffers.index() + 1,
            self.buffers.len(),
            self.buffer().display_name()
        );
        self.set_status(text);
    }

    // ===== FILES =====

    fn create_buffer(&mut self) {
        let mut buffer = Buffer::with_settings(&self.settings);
        buffer.wrap_width = self.buffer().wrap_width;
        self.buffers.new_buffer(buffer);
        log::info!("new buffer {}", self.buffers.len());
        self.announce_buffer();
    }

    /// Save the current buffer under its filename and report the outcome
    pub fn save(&mut self) {
        let result = self.buffer_mut().save();
        self.report_save(result);
    }

    /// Give the current buffer a filename and save it there
    pub fn save_as(&mut self, path: impl Into<PathBuf>) {
        let result = self.buffer_mut().save_as(path);
        self.report_save(result);
    }

    fn report_save(&mut self, result: crate::error::Result<usize>) {
        match result {
            Ok(n) => self.set_status(format!("{} bytes written to disk", n)),
            Err(e) => {
                log::warn!("save failed: {}", e);
                self.set_status(format!("Can't save! I/O error: {}", e));
            }
        }
    }

    /// Open `path` in a new buffer. An untouched empty scratch buffer is
    /// replaced instead. A file that does not exist yet opens as an empty
    /// buffer with that name.
    pub fn open_file(&mut self, path: &Path) {
        let mut buffer = match Buffer::open(path, &self.settings) {
            Ok(buffer) => buffer,
            Err(EditorError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("new file {}", path.display());
                let mut buffer = Buffer::with_settings(&self.settings);
                buffer.filename = Some(path.to_path_buf());
                buffer.select_syntax();
                buffer
            }
            Err(e) => {
                log::warn!("open failed: {}", e);
                self.set_status(format!("Can't open! {}", e));
                return;
            }
        };
        buffer.wrap_width = self.buffer().wrap_width;

        let current = self.buffer();
        if current.filename.is_none() && current.numrows() == 0 && !current.is_dirty() {
            self.buffers.replace_current(buffer);
        } else {
            self.buffers.new_buffer(buffer);
        }
        self.announce_buffer();
    }

    // ===== PROMPTS =====

    /// Called for every key typed into a prompt, with the input as it now
    /// reads
    pub fn prompt_key(&mut self, request: PromptRequest, input: &str, key: &Key) {
        if request != PromptRequest::Find {
            return;
        }
        if let Some(search) = self.search.as_mut() {
            search.step(self.buffers.current_mut(), input, key);
        }
    }

    /// Complete a prompt. `None` means it was cancelled.
    pub fn finish_prompt(&mut self, request: PromptRequest, answer: Option<String>) -> Flow {
        match (request, answer) {
            (PromptRequest::SaveAs, Some(name)) => self.save_as(name),
            (PromptRequest::SaveAs, None) => self.set_status("Save aborted"),

            (PromptRequest::Find, answer) => {
                if let Some(mut search) = self.search.take() {
                    if answer.is_none() {
                        search.cancel(self.buffers.current_mut());
                    }
                }
            }

            (PromptRequest::OpenFile, Some(name)) => self.open_file(Path::new(&name)),
            (PromptRequest::OpenFile, None) => self.set_status("Open aborted"),

            (PromptRequest::UnsavedNewBuffer, Some(answer)) => {
                return self.resolve_new_buffer(&answer);
            }
            (PromptRequest::UnsavedNewBuffer, None) => self.set_status("New buffer cancelled"),
        }
        Flow::Continue
    }

    /// Answer to the unsaved-changes question: `s` saves then creates the
    /// buffer, `d` creates it right away, anything else cancels
    pub fn resolve_new_buffer(&mut self, answer: &str) -> Flow {
        match answer.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => {
                if self.buffer().filename.is_none() {
                    self.set_status("Buffer has no name; save it with write-file first");
                    return Flow::Continue;
                }
                let saved = self.buffer_mut().save();
                let ok = saved.is_ok();
                self.report_save(saved);
                if ok {
                    self.create_buffer();
                }
            }
            Some('d') => self.create_buffer(),
            _ => self.set_status("New buffer cancelled"),
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::user_config;

    fn app() -> EditorApp {
        let mut config = Config::default();
        user_config::configure(&mut config);
        EditorApp::new(config.settings(), KeyMap::from_config(&config))
    }

    fn type_text(app: &mut EditorApp, text: &str) {
        for c in text.chars() {
            app.process_key(Key::Char(c));
        }
    }

    #[test]
    fn test_app_new() {
        let app = app();
        assert_eq!(app.buffers.len(), 1);
        assert_eq!(app.buffer().numrows(), 0);
        assert!(app.status_message().is_none());
    }

    #[test]
    fn test_unbound_keys_self_insert() {
        let mut app = app();
        type_text(&mut app, "hi");
        app.process_key(Key::Enter);
        type_text(&mut app, "there");
        assert_eq!(app.buffer().lines(), vec!["hi", "there"]);
    }

    #[test]
    fn test_quit_clean_buffer_is_immediate() {
        let mut app = app();
        assert_eq!(app.process_key(Key::Ctrl('q')), Flow::Quit);
    }

    #[test]
    fn test_quit_dirty_needs_confirmation() {
        let mut app = app();
        type_text(&mut app, "x");
        for remaining in (1..=3).rev() {
            assert_eq!(app.process_key(Key::Ctrl('q')), Flow::Continue);
            let status = app.status_message().unwrap_or_default();
            assert!(status.contains(&format!("{} more times", remaining)));
        }
        assert_eq!(app.process_key(Key::Ctrl('q')), Flow::Quit);
    }

    #[test]
    fn test_other_key_resets_quit_countdown() {
        let mut app = app();
        type_text(&mut app, "x");
        app.process_key(Key::Ctrl('q'));
        app.process_key(Key::Ctrl('q'));
        app.process_key(Key::Left);
        app.process_key(Key::Ctrl('q'));
        assert!(app.status_message().unwrap_or_default().contains("3 more times"));
    }

    #[test]
    fn test_save_without_name_prompts() {
        let mut app = app();
        assert_eq!(
            app.process_key(Key::Ctrl('s')),
            Flow::Prompt(PromptRequest::SaveAs)
        );
        assert_eq!(app.finish_prompt(PromptRequest::SaveAs, None), Flow::Continue);
        assert_eq!(app.status_message(), Some("Save aborted"));
    }

    #[test]
    fn test_buffer_manager_close() {
        let mut manager = BufferManager::new(Buffer::from_lines(["a"]));
        manager.new_buffer(Buffer::from_lines(["b"]));
        manager.new_buffer(Buffer::from_lines(["c"]));
        assert_eq!(manager.index(), 2);

        assert_eq!(manager.close_current(false), CloseOutcome::Closed);
        assert_eq!(manager.index(), 1);
        assert_eq!(manager.current().lines(), vec!["b"]);

        manager.switch_next();
        assert_eq!(manager.current().lines(), vec!["a"]);

        manager.current_mut().dirty = 1;
        assert_eq!(manager.close_current(false), CloseOutcome::Unsaved);
        assert_eq!(manager.close_current(true), CloseOutcome::Closed);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.close_current(false), CloseOutcome::LastBuffer);
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_status_bar_text() {
        let mut app = app();
        type_text(&mut app, "abc");
        let (left, right) = app.status_bar();
        assert_eq!(left, "[No Name] - 1 lines (modified)");
        assert_eq!(right, "no ft | 1/1");
    }

    #[test]
    fn test_copy_clears_selection() {
        let mut app = app();
        type_text(&mut app, "hello");
        app.process_key(Key::Home);
        app.process_key(Key::Ctrl(' '));
        app.process_key(Key::End);
        app.process_key(Key::Ctrl('k'));
        assert!(!app.buffer().selection_active);
        assert_eq!(app.buffer().clipboard, b"hello");
        assert_eq!(app.status_message(), Some("5 bytes copied to clipboard."));
    }

    #[test]
    fn test_delete_forward() {
        let mut app = app();
        type_text(&mut app, "abc");
        app.process_key(Key::Home);
        app.process_key(Key::Delete);
        assert_eq!(app.buffer().lines(), vec!["bc"]);
        assert_eq!(app.buffer().cx, 0);
    }

    #[test]
    fn test_resize_sets_wrap_width() {
        let mut app = app();
        app.settings.hard_wrap = true;
        app.resize(24, 15);
        assert_eq!(app.viewport.rows, 22);
        assert_eq!(app.buffer().wrap_width, Some(10));
    }
}
