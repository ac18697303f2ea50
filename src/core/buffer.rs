//! Buffer: one open document
//!
//! Owns the row store together with everything that is per-document: cursor,
//! viewport offsets, selection anchor, clipboard and undo history. Every
//! mutation of a row's raw bytes goes through the row helpers in this file,
//! which re-render and re-classify the row before returning and bump the dirty
//! counter.
//!
//! Text model used by the undo log and the selection code: every row is
//! terminated by a newline, and the virtual row `(0, numrows)` is the end of
//! the text.

use std::path::PathBuf;

use crate::config::Settings;
use crate::core::row::Row;
use crate::core::syntax::{self, SyntaxDefinition};
use crate::core::undo::UndoLog;

/// A position in the document, ordered row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub cy: usize,
    pub cx: usize,
}

impl Point {
    pub fn new(cx: usize, cy: usize) -> Self {
        Self { cy, cx }
    }
}

/// One open document
#[derive(Debug, Clone)]
pub struct Buffer {
    pub rows: Vec<Row>,

    // ===== CURSOR & VIEWPORT =====
    /// Raw column of the cursor
    pub cx: usize,
    /// Row of the cursor; may equal `numrows()` (the virtual row past the end)
    pub cy: usize,
    /// Display column of the cursor, refreshed by `scroll`
    pub rx: usize,
    pub rowoff: usize,
    pub coloff: usize,

    // ===== DOCUMENT STATE =====
    /// Edit counter; zero means no unsaved changes
    pub dirty: usize,
    pub filename: Option<PathBuf>,
    pub syntax: Option<&'static SyntaxDefinition>,

    // ===== PER-BUFFER SETTINGS =====
    pub tab_stop: usize,
    pub soft_tabs: bool,
    /// Text width hard wrap reflows at; `None` disables hard wrap
    pub wrap_width: Option<usize>,

    // ===== SELECTION & HISTORY =====
    /// Selection anchor
    pub mark: Point,
    pub selection_active: bool,
    pub clipboard: Vec<u8>,
    pub history: UndoLog,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Default tab stop when no configuration is supplied
    pub const DEFAULT_TAB_STOP: usize = 8;

    /// Create an empty, unnamed buffer with default settings
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            cx: 0,
            cy: 0,
            rx: 0,
            rowoff: 0,
            coloff: 0,
            dirty: 0,
            filename: None,
            syntax: None,
            tab_stop: Self::DEFAULT_TAB_STOP,
            soft_tabs: false,
            wrap_width: None,
            mark: Point::default(),
            selection_active: false,
            clipboard: Vec::new(),
            history: UndoLog::new(),
        }
    }

    /// Create an empty buffer that uses the given editor settings
    pub fn with_settings(settings: &Settings) -> Self {
        let mut buffer = Self::new();
        buffer.apply_settings(settings);
        buffer
    }

    /// Build a clean buffer from already split lines (no trailing newlines)
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut buffer = Self::new();
        buffer.ingest_lines(lines);
        buffer
    }

    /// Adopt tab and soft-tab settings. Rows are re-rendered when the tab
    /// width changes.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.soft_tabs = settings.soft_tabs > 0;
        if self.tab_stop != settings.tab_stop {
            self.tab_stop = settings.tab_stop;
            self.rehighlight_all();
        }
    }

    pub fn numrows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    pub fn cursor(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn set_cursor(&mut self, p: Point) {
        self.cy = p.cy.min(self.numrows());
        self.cx = p.cx.min(self.row_len(self.cy));
    }

    /// Length of row `at`, or 0 for the virtual row
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::size)
    }

    /// Filename as shown to the user
    pub fn display_name(&self) -> String {
        self.filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    // =========================================================================
    // ROW STORE
    // =========================================================================

    /// Insert a row at `at` (0..=numrows). Out of range is a no-op.
    pub fn insert_row(&mut self, at: usize, text: &[u8]) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(at, text));
        self.renumber_from(at + 1);
        self.update_row(at);
        // The row below now follows a different comment state
        if at + 1 < self.rows.len() {
            self.highlight_from(at + 1);
        }
        self.dirty += 1;
    }

    /// Remove row `at`. Out of range is a no-op.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        // The row that slid into `at` now follows a different comment state
        if at < self.rows.len() {
            self.highlight_from(at);
        }
        self.dirty += 1;
    }

    fn renumber_from(&mut self, from: usize) {
        for (index, row) in self.rows.iter_mut().enumerate().skip(from) {
            row.index = index;
        }
    }

    /// Re-render row `at` and re-classify it, carrying a changed open-comment
    /// state forward.
    pub fn update_row(&mut self, at: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.render(self.tab_stop);
        self.highlight_from(at);
    }

    /// Classify rows starting at `at` until a row's open-comment state comes
    /// out unchanged or the last row is reached.
    fn highlight_from(&mut self, at: usize) {
        let syntax = self.syntax;
        let mut at = at;
        while at < self.rows.len() {
            let in_comment = at > 0 && self.rows[at - 1].open_comment;
            let row = &mut self.rows[at];
            let (highlight, open) = syntax::classify(&row.rendered, syntax, in_comment);
            row.highlight = highlight;

            let changed = row.open_comment != open;
            row.open_comment = open;
            if !changed {
                break;
            }
            at += 1;
        }
    }

    /// Re-render and re-classify every row from the top
    pub fn rehighlight_all(&mut self) {
        let syntax = self.syntax;
        let mut in_comment = false;
        for row in &mut self.rows {
            row.render(self.tab_stop);
            let (highlight, open) = syntax::classify(&row.rendered, syntax, in_comment);
            row.highlight = highlight;
            row.open_comment = open;
            in_comment = open;
        }
    }

    /// Resolve the syntax definition from the filename and re-classify every
    /// row. Runs whenever the filename is set or changes.
    pub fn select_syntax(&mut self) {
        self.syntax = self
            .filename
            .as_deref()
            .and_then(syntax::syntax_for_filename);
        log::debug!(
            "syntax for {}: {}",
            self.display_name(),
            self.syntax.map_or("none", |s| s.filetype)
        );
        self.rehighlight_all();
    }

    // =========================================================================
    // ROW HELPERS
    // =========================================================================

    /// Insert one byte into row `at` at raw offset `cx` (clamped to the row end)
    pub fn row_insert_char(&mut self, at: usize, cx: usize, c: u8) {
        self.row_insert_bytes(at, cx, &[c]);
    }

    /// Insert a byte run into row `at` at raw offset `cx` (clamped to the row end)
    pub fn row_insert_bytes(&mut self, at: usize, cx: usize, bytes: &[u8]) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        let cx = cx.min(row.size());
        row.raw.splice(cx..cx, bytes.iter().copied());
        self.update_row(at);
        self.dirty += 1;
    }

    /// Delete up to `len` bytes from row `at` starting at `cx`
    pub fn row_delete_chars(&mut self, at: usize, cx: usize, len: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        if cx >= row.size() {
            return;
        }
        let end = (cx + len).min(row.size());
        row.raw.drain(cx..end);
        self.update_row(at);
        self.dirty += 1;
    }

    /// Append a byte run to the end of row `at`
    pub fn row_append_string(&mut self, at: usize, bytes: &[u8]) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        row.raw.extend_from_slice(bytes);
        self.update_row(at);
        self.dirty += 1;
    }

    /// Cut row `at` down to its first `len` bytes
    pub fn row_truncate(&mut self, at: usize, len: usize) {
        let Some(row) = self.rows.get_mut(at) else {
            return;
        };
        if len >= row.size() {
            return;
        }
        row.raw.truncate(len);
        self.update_row(at);
        self.dirty += 1;
    }

    // =========================================================================
    // TEXT PRIMITIVES
    // =========================================================================

    /// Insert `data` at `at`, where `\n` starts a new row. Returns the point
    /// just past the inserted text.
    ///
    /// At the virtual row the data is appended to the end of the text; data
    /// ending in `\n` then adds whole rows without leaving an extra empty row.
    pub fn insert_text(&mut self, at: Point, data: &[u8]) -> Point {
        if data.is_empty() {
            return at;
        }

        if at.cy >= self.numrows() {
            let cy = self.numrows();
            self.insert_row(cy, b"");
            let end = self.insert_text(Point::new(0, cy), data);
            if data.ends_with(b"\n") {
                self.delete_row(self.numrows() - 1);
            }
            return end;
        }

        let cy = at.cy;
        let cx = at.cx.min(self.row_len(cy));
        let mut segments = data.split(|&b| b == b'\n');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&[u8]> = segments.collect();

        if rest.is_empty() {
            self.row_insert_bytes(cy, cx, first);
            return Point::new(cx + first.len(), cy);
        }

        let tail = self.rows[cy].raw[cx..].to_vec();
        self.row_truncate(cy, cx);
        self.row_append_string(cy, first);

        let mut end = at;
        for (i, segment) in rest.iter().enumerate() {
            let y = cy + i + 1;
            if i + 1 == rest.len() {
                let mut line = segment.to_vec();
                line.extend_from_slice(&tail);
                self.insert_row(y, &line);
                end = Point::new(segment.len(), y);
            } else {
                self.insert_row(y, segment);
            }
        }
        end
    }

    /// Delete `len` bytes of text starting at `at` and return them. A row end
    /// counts as one `\n` byte. Stops early at the end of the text.
    pub fn delete_text(&mut self, at: Point, len: usize) -> Vec<u8> {
        let mut removed = Vec::with_capacity(len);
        let cy = at.cy;
        let mut remaining = len;

        while remaining > 0 && cy < self.numrows() {
            let size = self.row_len(cy);
            let cx = at.cx.min(size);

            if cx < size {
                let n = (size - cx).min(remaining);
                removed.extend_from_slice(&self.rows[cy].raw[cx..cx + n]);
                self.row_delete_chars(cy, cx, n);
                remaining -= n;
                continue;
            }

            if cy + 1 < self.numrows() {
                let next = self.rows[cy + 1].raw.clone();
                self.row_append_string(cy, &next);
                self.delete_row(cy + 1);
            } else if cx == 0 {
                // Last row and empty: its terminator goes with it
                self.delete_row(cy);
            } else {
                break;
            }
            removed.push(b'\n');
            remaining -= 1;
        }
        removed
    }

    /// Bytes between two points, joining rows with `\n`
    pub fn text_between(&self, start: Point, end: Point) -> Vec<u8> {
        let mut out = Vec::new();
        let last = end.cy.min(self.numrows().saturating_sub(1));
        for cy in start.cy..=last {
            let Some(row) = self.rows.get(cy) else {
                break;
            };
            let from = if cy == start.cy { start.cx.min(row.size()) } else { 0 };
            let to = if cy == end.cy { end.cx.min(row.size()) } else { row.size() };
            if from < to {
                out.extend_from_slice(&row.raw[from..to]);
            }
            if cy < end.cy {
                out.push(b'\n');
            }
        }
        out
    }

    // =========================================================================
    // SERIALIZATION
    // =========================================================================

    /// The whole document with every row terminated by `\n`
    pub fn rows_to_string(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.size() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for row in &self.rows {
            buf.extend_from_slice(&row.raw);
            buf.push(b'\n');
        }
        buf
    }

    /// Append already split lines as rows and mark the buffer clean
    pub fn ingest_lines<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        for line in lines {
            let index = self.rows.len();
            self.rows.push(Row::new(index, line.as_ref()));
        }
        self.rehighlight_all();
        self.dirty = 0;
    }

    /// Raw content of every row, for tests and diagnostics
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| String::from_utf8_lossy(&r.raw).into_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::syntax::Highlight;

    fn c_buffer(lines: &[&str]) -> Buffer {
        let mut buffer = Buffer::from_lines(lines.iter().map(|l| l.as_bytes()));
        buffer.filename = Some(PathBuf::from("test.c"));
        buffer.select_syntax();
        buffer
    }

    #[test]
    fn test_insert_row_renumbers() {
        let mut buffer = Buffer::from_lines(["a", "c"]);
        buffer.insert_row(1, b"b");
        assert_eq!(buffer.lines(), vec!["a", "b", "c"]);
        for (i, row) in buffer.rows.iter().enumerate() {
            assert_eq!(row.index, i);
        }
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_insert_row_out_of_range_is_noop() {
        let mut buffer = Buffer::from_lines(["a"]);
        buffer.insert_row(5, b"x");
        assert_eq!(buffer.lines(), vec!["a"]);
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn test_delete_row_renumbers() {
        let mut buffer = Buffer::from_lines(["a", "b", "c"]);
        buffer.delete_row(0);
        assert_eq!(buffer.lines(), vec!["b", "c"]);
        assert_eq!(buffer.rows[1].index, 1);
        buffer.delete_row(9);
        assert_eq!(buffer.numrows(), 2);
    }

    #[test]
    fn test_row_helpers_keep_render_in_sync() {
        let mut buffer = Buffer::from_lines(["ab"]);
        buffer.row_insert_char(0, 1, b'\t');
        assert_eq!(buffer.rows[0].rendered, b"a       b");
        buffer.row_delete_chars(0, 1, 1);
        assert_eq!(buffer.rows[0].rendered, b"ab");
        buffer.row_append_string(0, b"cd");
        assert_eq!(buffer.rows[0].raw, b"abcd");
        assert_eq!(buffer.rows[0].highlight.len(), 4);
        assert_eq!(buffer.dirty, 3);
    }

    #[test]
    fn test_row_insert_clamps_column() {
        let mut buffer = Buffer::from_lines(["ab"]);
        buffer.row_insert_char(0, 99, b'c');
        assert_eq!(buffer.rows[0].raw, b"abc");
    }

    #[test]
    fn test_comment_opens_and_propagates() {
        let mut buffer = c_buffer(&["int a;", "int b;", "int c;"]);
        buffer.row_insert_bytes(0, 0, b"/* ");
        assert!(buffer.rows[0].open_comment);
        assert!(buffer.rows[1].highlight.iter().all(|&h| h == Highlight::MlComment));
        assert!(buffer.rows[2].highlight.iter().all(|&h| h == Highlight::MlComment));

        // Closing on row 1 releases row 2
        buffer.row_append_string(1, b" */");
        assert!(!buffer.rows[1].open_comment);
        assert_eq!(buffer.rows[2].highlight[0], Highlight::Keyword2);
    }

    #[test]
    fn test_deleting_comment_row_reclassifies_next() {
        let mut buffer = c_buffer(&["/* open", "int x;"]);
        assert_eq!(buffer.rows[1].highlight[0], Highlight::MlComment);
        buffer.delete_row(0);
        assert_eq!(buffer.rows[0].highlight[0], Highlight::Keyword2);
    }

    #[test]
    fn test_splitting_comment_row_reclassifies_rows_below() {
        let mut buffer = c_buffer(&["/* a */ x", "int c;"]);
        buffer.set_cursor(Point::new(2, 0));
        buffer.insert_newline();
        assert_eq!(buffer.lines(), vec!["/*", " a */ x", "int c;"]);

        assert!(buffer.rows[0].open_comment);
        assert!(!buffer.rows[1].open_comment);
        assert!(!buffer.rows[2].open_comment);
        assert_eq!(buffer.rows[2].highlight[..3], [Highlight::Keyword2; 3]);
        assert_eq!(buffer.rows[2].highlight[3], Highlight::Normal);

        let mut fresh = buffer.clone();
        fresh.rehighlight_all();
        assert_eq!(buffer.rows, fresh.rows);
    }

    #[test]
    fn test_insert_row_reclassifies_following_row() {
        let mut buffer = c_buffer(&["/* open", "int x;"]);
        buffer.insert_row(1, b"*/");
        assert!(!buffer.rows[1].open_comment);
        assert_eq!(buffer.rows[2].highlight[0], Highlight::Keyword2);
    }

    #[test]
    fn test_select_syntax_none_clears_classes() {
        let mut buffer = c_buffer(&["/* x", "int y;"]);
        buffer.filename = Some(PathBuf::from("notes.txt"));
        buffer.select_syntax();
        assert!(buffer.syntax.is_none());
        assert!(buffer.rows.iter().all(|r| !r.open_comment));
        assert!(buffer.rows[1].highlight.iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_rows_to_string_terminates_every_row() {
        let buffer = Buffer::from_lines(["one", "", "two"]);
        assert_eq!(buffer.rows_to_string(), b"one\n\ntwo\n");
        assert_eq!(Buffer::new().rows_to_string(), b"");
    }

    #[test]
    fn test_insert_text_splits_rows() {
        let mut buffer = Buffer::from_lines(["hello world"]);
        let end = buffer.insert_text(Point::new(5, 0), b"\nnew\n");
        assert_eq!(buffer.lines(), vec!["hello", "new", " world"]);
        assert_eq!(end, Point::new(0, 2));
    }

    #[test]
    fn test_insert_text_at_virtual_row() {
        let mut buffer = Buffer::from_lines(["a"]);
        let end = buffer.insert_text(Point::new(0, 1), b"b\n");
        assert_eq!(buffer.lines(), vec!["a", "b"]);
        assert_eq!(end, Point::new(0, 2));

        let end = buffer.insert_text(Point::new(0, 2), b"\n");
        assert_eq!(buffer.lines(), vec!["a", "b", ""]);
        assert_eq!(end, Point::new(0, 3));
    }

    #[test]
    fn test_delete_text_joins_rows() {
        let mut buffer = Buffer::from_lines(["hello", "world"]);
        let removed = buffer.delete_text(Point::new(3, 0), 4);
        assert_eq!(removed, b"lo\nw");
        assert_eq!(buffer.lines(), vec!["helorld"]);
    }

    #[test]
    fn test_delete_text_removes_empty_last_row() {
        let mut buffer = Buffer::from_lines(["a", ""]);
        let removed = buffer.delete_text(Point::new(0, 1), 1);
        assert_eq!(removed, b"\n");
        assert_eq!(buffer.lines(), vec!["a"]);
    }

    #[test]
    fn test_insert_then_delete_text_is_identity() {
        let mut buffer = Buffer::from_lines(["alpha", "beta"]);
        let at = Point::new(2, 0);
        buffer.insert_text(at, b"X\nY\nZ");
        let removed = buffer.delete_text(at, 5);
        assert_eq!(removed, b"X\nY\nZ");
        assert_eq!(buffer.lines(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_text_between() {
        let buffer = Buffer::from_lines(["hello", "big", "world"]);
        assert_eq!(
            buffer.text_between(Point::new(3, 0), Point::new(2, 2)),
            b"lo\nbig\nwo"
        );
        assert_eq!(buffer.text_between(Point::new(1, 1), Point::new(3, 1)), b"ig");
    }

    #[test]
    fn test_point_ordering_is_row_major() {
        assert!(Point::new(9, 0) < Point::new(0, 1));
        assert!(Point::new(1, 2) < Point::new(2, 2));
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut buffer = Buffer::from_lines(["abc"]);
        buffer.set_cursor(Point::new(10, 0));
        assert_eq!(buffer.cursor(), Point::new(3, 0));
        buffer.set_cursor(Point::new(4, 7));
        assert_eq!(buffer.cursor(), Point::new(0, 1));
    }
}
