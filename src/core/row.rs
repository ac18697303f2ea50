//! Row: one logical line of a buffer
//!
//! A row owns its raw bytes plus two derived arrays: the tab-expanded
//! `rendered` bytes and one highlight class per rendered byte. The derived
//! arrays are only ever rebuilt through the owning buffer, so they never drift
//! from `raw`.
//!
//! The coordinate transform between raw offsets (`cx`) and display columns
//! (`rx`) also lives here.

use crate::core::syntax::Highlight;

/// A single line of text with its derived render state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// Position of this row in its buffer; always equal to its index in the row vector
    pub index: usize,
    /// Raw content without the trailing newline
    pub raw: Vec<u8>,
    /// `raw` with every tab expanded to the next tab stop
    pub rendered: Vec<u8>,
    /// One highlight class per byte of `rendered`
    pub highlight: Vec<Highlight>,
    /// True when an unterminated multi-line comment is still open at the end of this row
    pub open_comment: bool,
}

impl Row {
    /// Create a row whose derived state has not been computed yet
    pub fn new(index: usize, raw: &[u8]) -> Self {
        Self {
            index,
            raw: raw.to_vec(),
            rendered: Vec::new(),
            highlight: Vec::new(),
            open_comment: false,
        }
    }

    /// Number of raw bytes
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Number of rendered bytes (display width)
    pub fn rsize(&self) -> usize {
        self.rendered.len()
    }

    /// Rebuild `rendered` from `raw`, expanding tabs with spaces up to the next
    /// multiple of `tab_stop`. Highlights are reset to `Normal` at the new
    /// length; classification is the buffer's job because it needs the previous
    /// row's comment state.
    pub fn render(&mut self, tab_stop: usize) {
        let tab_stop = tab_stop.max(1);
        let tabs = self.raw.iter().filter(|&&b| b == b'\t').count();

        let mut rendered = Vec::with_capacity(self.raw.len() + tabs * (tab_stop - 1));
        for &byte in &self.raw {
            if byte == b'\t' {
                rendered.push(b' ');
                while rendered.len() % tab_stop != 0 {
                    rendered.push(b' ');
                }
            } else {
                rendered.push(byte);
            }
        }

        self.rendered = rendered;
        self.highlight = vec![Highlight::Normal; self.rendered.len()];
    }

    /// Leading whitespace of the row (what a new line below it inherits)
    pub fn indent(&self) -> &[u8] {
        let len = self
            .raw
            .iter()
            .take_while(|b| b.is_ascii_whitespace())
            .count();
        &self.raw[..len]
    }
}

// =============================================================================
// COORDINATE TRANSFORM
// =============================================================================

/// Display column of raw offset `cx`.
///
/// A tab advances the column to the next multiple of `tab_stop`. Offsets past
/// the end of the row are clamped to the row length.
pub fn cx_to_rx(raw: &[u8], cx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let mut rx = 0;
    for &byte in raw.iter().take(cx) {
        if byte == b'\t' {
            rx += (tab_stop - 1) - (rx % tab_stop);
        }
        rx += 1;
    }
    rx
}

/// Raw offset for display column `rx`.
///
/// Returns the first `cx` whose character covers column `rx`, so a column in
/// the middle of an expanded tab lands on the tab itself. Columns past the end
/// of the row return the row length.
pub fn rx_to_cx(raw: &[u8], rx: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    let mut cur_rx = 0;
    for (cx, &byte) in raw.iter().enumerate() {
        if byte == b'\t' {
            cur_rx += (tab_stop - 1) - (cur_rx % tab_stop);
        }
        cur_rx += 1;

        if cur_rx > rx {
            return cx;
        }
    }
    raw.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_expands_tabs_to_stops() {
        let mut row = Row::new(0, b"\tab\tc");
        row.render(4);
        assert_eq!(row.rendered, b"    ab  c");
        assert_eq!(row.highlight.len(), row.rendered.len());
    }

    #[test]
    fn test_render_without_tabs_is_identity() {
        let mut row = Row::new(0, b"plain text");
        row.render(8);
        assert_eq!(row.rendered, row.raw);
    }

    #[test]
    fn test_cx_to_rx_with_tabs() {
        let raw = b"a\tb";
        assert_eq!(cx_to_rx(raw, 0, 8), 0);
        assert_eq!(cx_to_rx(raw, 1, 8), 1);
        assert_eq!(cx_to_rx(raw, 2, 8), 8);
        assert_eq!(cx_to_rx(raw, 3, 8), 9);
        // Past the end clamps
        assert_eq!(cx_to_rx(raw, 10, 8), 9);
    }

    #[test]
    fn test_rx_to_cx_lands_on_tab() {
        let raw = b"a\tb";
        assert_eq!(rx_to_cx(raw, 0, 8), 0);
        // Columns 1..8 are covered by the tab at cx 1
        assert_eq!(rx_to_cx(raw, 1, 8), 1);
        assert_eq!(rx_to_cx(raw, 5, 8), 1);
        assert_eq!(rx_to_cx(raw, 8, 8), 2);
        assert_eq!(rx_to_cx(raw, 50, 8), 3);
    }

    #[test]
    fn test_round_trip_outside_tabs() {
        let raw = b"\tx\t\tyz";
        for cx in 0..=raw.len() {
            let rx = cx_to_rx(raw, cx, 4);
            assert_eq!(rx_to_cx(raw, rx, 4), cx);
        }
    }

    #[test]
    fn test_indent() {
        assert_eq!(Row::new(0, b"  \tfoo").indent(), b"  \t");
        assert_eq!(Row::new(0, b"foo").indent(), b"");
        assert_eq!(Row::new(0, b"   ").indent(), b"   ");
    }
}
