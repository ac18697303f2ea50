//! Incremental search
//!
//! Driven one key at a time while the user edits the query. Each step first
//! puts back the highlight it painted on the previous step, so at most one row
//! carries `Match` classes at any time.

use crate::core::buffer::{Buffer, Point};
use crate::core::input::Key;
use crate::core::row::rx_to_cx;
use crate::core::syntax::Highlight;

/// Cursor and viewport captured when a search starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedView {
    cursor: Point,
    rowoff: usize,
    coloff: usize,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    last_match: Option<usize>,
    forward: bool,
    saved_highlight: Option<(usize, Vec<Highlight>)>,
    origin: SavedView,
}

impl SearchState {
    /// Start a search, remembering where the cursor and viewport were
    pub fn begin(buffer: &Buffer) -> Self {
        Self {
            last_match: None,
            forward: true,
            saved_highlight: None,
            origin: SavedView {
                cursor: buffer.cursor(),
                rowoff: buffer.rowoff,
                coloff: buffer.coloff,
            },
        }
    }

    /// React to one key of the prompt with the query as it now reads.
    ///
    /// Enter and Esc end the search. Right/Down look for the next match,
    /// Left/Up for the previous one; any other key restarts from the top.
    /// Matching is a substring search over each row's rendered text and wraps
    /// around the document.
    pub fn step(&mut self, buffer: &mut Buffer, query: &str, key: &Key) {
        self.restore_highlight(buffer);

        match key {
            Key::Enter | Key::Esc => {
                self.last_match = None;
                self.forward = true;
                return;
            }
            Key::Right | Key::Down => self.forward = true,
            Key::Left | Key::Up => self.forward = false,
            _ => {
                self.last_match = None;
                self.forward = true;
            }
        }
        if self.last_match.is_none() {
            self.forward = true;
        }

        let needle = query.as_bytes();
        let numrows = buffer.numrows();
        if needle.is_empty() || numrows == 0 {
            return;
        }

        let mut current = self.last_match;
        for _ in 0..numrows {
            let next = match (current, self.forward) {
                (None, _) => 0,
                (Some(i), true) => (i + 1) % numrows,
                (Some(0), false) => numrows - 1,
                (Some(i), false) => i - 1,
            };
            current = Some(next);

            let row = &buffer.rows[next];
            let Some(rx) = row
                .rendered
                .windows(needle.len())
                .position(|window| window == needle)
            else {
                continue;
            };

            self.last_match = Some(next);
            let cx = rx_to_cx(&row.raw, rx, buffer.tab_stop);
            buffer.set_cursor(Point::new(cx, next));
            // Scrolling clamps this back so the match ends up on the top line
            buffer.rowoff = numrows;

            let row = &mut buffer.rows[next];
            self.saved_highlight = Some((next, row.highlight.clone()));
            let end = (rx + needle.len()).min(row.highlight.len());
            row.highlight[rx..end].fill(Highlight::Match);
            break;
        }
    }

    /// Put cursor and viewport back where they were when the search began
    pub fn cancel(&mut self, buffer: &mut Buffer) {
        self.restore_highlight(buffer);
        buffer.set_cursor(self.origin.cursor);
        buffer.rowoff = self.origin.rowoff;
        buffer.coloff = self.origin.coloff;
    }

    fn restore_highlight(&mut self, buffer: &mut Buffer) {
        if let Some((at, highlight)) = self.saved_highlight.take() {
            if let Some(row) = buffer.rows.get_mut(at) {
                if row.highlight.len() == highlight.len() {
                    row.highlight = highlight;
                }
            }
        }
    }
}
