//! Selection & Clipboard
//!
//! The selection runs between the mark and the live cursor, whichever comes
//! first in row-major order. The clipboard is per buffer and holds raw bytes
//! with `\n` between rows.

use crate::core::buffer::{Buffer, Point};
use crate::core::undo::ActionKind;

impl Buffer {
    /// Set the mark at the cursor, or drop the selection if one is active.
    /// Returns whether a selection is active afterwards.
    pub fn toggle_mark(&mut self) -> bool {
        if self.selection_active {
            self.selection_active = false;
        } else {
            self.mark = self.cursor();
            self.selection_active = true;
        }
        self.selection_active
    }

    /// Ordered `(start, end)` of the active selection. An end on the virtual
    /// row is pulled back to the end of the last real row.
    pub fn selection_span(&self) -> Option<(Point, Point)> {
        if !self.selection_active {
            return None;
        }
        let (start, end) = if self.cursor() < self.mark {
            (self.cursor(), self.mark)
        } else {
            (self.mark, self.cursor())
        };
        Some((self.clamp_to_text(start), self.clamp_to_text(end)))
    }

    fn clamp_to_text(&self, p: Point) -> Point {
        match self.numrows() {
            0 => Point::default(),
            n if p.cy >= n => Point::new(self.row_len(n - 1), n - 1),
            _ => Point::new(p.cx.min(self.row_len(p.cy)), p.cy),
        }
    }

    /// Whether the byte at raw offset `cx` of row `cy` lies inside the
    /// selection
    pub fn is_selected(&self, cy: usize, cx: usize) -> bool {
        self.selection_span()
            .is_some_and(|(start, end)| (start..end).contains(&Point::new(cx, cy)))
    }

    /// Copy the selection into the clipboard. Returns the number of bytes
    /// copied, or `None` without a selection. An empty span leaves the
    /// clipboard as it was.
    pub fn copy(&mut self) -> Option<usize> {
        let (start, end) = self.selection_span()?;
        let text = self.text_between(start, end);
        if text.is_empty() {
            return Some(0);
        }
        let len = text.len();
        self.clipboard = text;
        Some(len)
    }

    /// Remove the selected text as a single undoable action. The cursor lands
    /// on the start of the span and the selection is cleared.
    pub fn delete_selection(&mut self) {
        let Some((start, end)) = self.selection_span() else {
            return;
        };
        let before = self.cursor();
        let len = self.text_between(start, end).len();
        let removed = self.delete_text(start, len);

        self.selection_active = false;
        self.set_cursor(start);
        if !removed.is_empty() {
            self.record(ActionKind::Delete, start, removed, before, false);
        }
    }

    /// Copy then delete the selection. Returns the number of bytes cut.
    pub fn cut(&mut self) -> Option<usize> {
        let copied = self.copy()?;
        self.delete_selection();
        Some(copied)
    }

    /// Type the clipboard back in at the cursor, one byte at a time, with `\n`
    /// handled as Enter.
    pub fn paste(&mut self) {
        let clipboard = self.clipboard.clone();
        for byte in clipboard {
            if byte == b'\n' {
                self.insert_newline();
            } else {
                self.insert_char(byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(buffer: &mut Buffer, from: Point, to: Point) {
        buffer.set_cursor(from);
        buffer.toggle_mark();
        buffer.set_cursor(to);
    }

    #[test]
    fn test_span_is_ordered_either_way() {
        let mut buffer = Buffer::from_lines(["hello", "world"]);
        select(&mut buffer, Point::new(2, 1), Point::new(1, 0));
        assert_eq!(
            buffer.selection_span(),
            Some((Point::new(1, 0), Point::new(2, 1)))
        );
    }

    #[test]
    fn test_toggle_mark_cancels() {
        let mut buffer = Buffer::from_lines(["x"]);
        assert!(buffer.toggle_mark());
        assert!(!buffer.toggle_mark());
        assert_eq!(buffer.selection_span(), None);
        assert_eq!(buffer.copy(), None);
    }

    #[test]
    fn test_copy_single_row() {
        let mut buffer = Buffer::from_lines(["hello world"]);
        select(&mut buffer, Point::new(6, 0), Point::new(11, 0));
        assert_eq!(buffer.copy(), Some(5));
        assert_eq!(buffer.clipboard, b"world");
        // Copy leaves the text alone
        assert_eq!(buffer.lines(), vec!["hello world"]);
    }

    #[test]
    fn test_copy_replaces_clipboard() {
        let mut buffer = Buffer::from_lines(["abc"]);
        buffer.clipboard = b"old".to_vec();
        select(&mut buffer, Point::new(0, 0), Point::new(1, 0));
        buffer.copy();
        assert_eq!(buffer.clipboard, b"a");
    }

    #[test]
    fn test_delete_selection_multi_row() {
        let mut buffer = Buffer::from_lines(["first", "middle", "last"]);
        select(&mut buffer, Point::new(2, 0), Point::new(2, 2));
        buffer.delete_selection();
        assert_eq!(buffer.lines(), vec!["fist"]);
        assert_eq!(buffer.cursor(), Point::new(2, 0));
        assert!(!buffer.selection_active);

        assert!(buffer.undo());
        assert_eq!(buffer.lines(), vec!["first", "middle", "last"]);
    }

    #[test]
    fn test_selection_end_on_virtual_row() {
        let mut buffer = Buffer::from_lines(["ab", "cd"]);
        select(&mut buffer, Point::new(1, 0), Point::new(0, 2));
        assert_eq!(buffer.copy(), Some(4));
        assert_eq!(buffer.clipboard, b"b\ncd");
    }

    #[test]
    fn test_cut_then_paste_restores() {
        let mut buffer = Buffer::from_lines(["hello", "world"]);
        select(&mut buffer, Point::new(0, 0), Point::new(2, 1));
        assert_eq!(buffer.cut(), Some(8));
        assert_eq!(buffer.lines(), vec!["rld"]);
        assert_eq!(buffer.clipboard, b"hello\nwo");

        buffer.paste();
        assert_eq!(buffer.lines(), vec!["hello", "world"]);
        assert_eq!(buffer.cursor(), Point::new(2, 1));
    }

    #[test]
    fn test_is_selected() {
        let mut buffer = Buffer::from_lines(["abcd"]);
        select(&mut buffer, Point::new(1, 0), Point::new(3, 0));
        assert!(!buffer.is_selected(0, 0));
        assert!(buffer.is_selected(0, 1));
        assert!(buffer.is_selected(0, 2));
        assert!(!buffer.is_selected(0, 3));
    }
}
