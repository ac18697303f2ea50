//! Edit Engine
//!
//! Cursor-relative editing: typed characters, newlines with auto-indent,
//! backspace (including soft-tab removal) and tab insertion. Each operation
//! applies its change through the buffer's text primitives and records exactly
//! what it did in the undo log.

use crate::core::buffer::{Buffer, Point};
use crate::core::undo::ActionKind;

impl Buffer {
    /// Insert `c` at the cursor and advance it. On the virtual row past the
    /// end a new empty row is appended first. Hard wrap runs afterwards when
    /// enabled.
    pub fn insert_char(&mut self, c: u8) {
        let before = self.cursor();
        let mut chained = false;

        if self.cy >= self.numrows() {
            let at = Point::new(0, self.numrows());
            self.insert_row(at.cy, b"");
            self.set_cursor(at);
            self.record(ActionKind::Insert, at, b"\n".to_vec(), before, false);
            chained = true;
        }

        let at = self.cursor();
        self.row_insert_char(self.cy, self.cx, c);
        self.cx += 1;
        self.record(ActionKind::Insert, at, vec![c], before, chained);

        self.apply_hard_wrap();
    }

    /// Break the line at the cursor. The new line inherits the current row's
    /// leading whitespace and the cursor lands right after it.
    ///
    /// At column 0 the indent goes into a new row inserted above, and the
    /// cursor follows the original row down.
    pub fn insert_newline(&mut self) {
        let before = self.cursor();
        let indent = self
            .rows
            .get(self.cy)
            .map(|row| row.indent().to_vec())
            .unwrap_or_default();

        let (at, data) = if self.cy >= self.numrows() {
            (Point::new(0, self.numrows()), b"\n".to_vec())
        } else if self.cx == 0 {
            let mut data = indent.clone();
            data.push(b'\n');
            (Point::new(0, self.cy), data)
        } else {
            let mut data = vec![b'\n'];
            data.extend_from_slice(&indent);
            (before, data)
        };

        self.insert_text(at, &data);
        self.cy += 1;
        self.cx = indent.len();
        self.record(ActionKind::Insert, at, data, before, false);
    }

    /// Delete backwards from the cursor.
    ///
    /// With soft tabs on, a full tab stop of spaces right before the cursor is
    /// removed as one unit. At column 0 the row is joined onto the previous
    /// one. No-op at the start of the document and on the virtual row.
    pub fn delete_char(&mut self) {
        if self.cy >= self.numrows() || (self.cx == 0 && self.cy == 0) {
            return;
        }

        let before = self.cursor();
        if self.cx > 0 {
            let count = if self.soft_tab_before_cursor() {
                self.tab_stop
            } else {
                1
            };
            let at = Point::new(self.cx - count, self.cy);
            let removed = self.delete_text(at, count);
            self.cx = at.cx;
            self.record(ActionKind::Delete, at, removed, before, false);
        } else {
            let at = Point::new(self.row_len(self.cy - 1), self.cy - 1);
            let removed = self.delete_text(at, 1);
            self.set_cursor(at);
            self.record(ActionKind::Delete, at, removed, before, false);
        }
    }

    /// Tab key: `tab_stop` spaces when soft tabs are on (one action per
    /// space), otherwise a literal tab.
    pub fn insert_tab(&mut self) {
        if self.soft_tabs {
            for _ in 0..self.tab_stop {
                self.insert_char(b' ');
            }
        } else {
            self.insert_char(b'\t');
        }
    }

    fn soft_tab_before_cursor(&self) -> bool {
        let stop = self.tab_stop;
        if !self.soft_tabs || stop == 0 || self.cx < stop || self.cx % stop != 0 {
            return false;
        }
        self.rows
            .get(self.cy)
            .and_then(|row| row.raw.get(self.cx - stop..self.cx))
            .is_some_and(|run| run.iter().all(|&b| b == b' '))
    }
}
