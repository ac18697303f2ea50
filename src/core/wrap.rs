//! Reflow Engine and soft-wrap geometry
//!
//! Hard wrap splits the current row at the last space before the text width
//! whenever typing pushes it past that width. Soft wrap never touches the rows;
//! it only decides how a row is cut into screen lines.

use std::ops::Range;

use crate::core::buffer::{Buffer, Point};
use crate::core::row::{Row, rx_to_cx};
use crate::core::undo::ActionKind;

/// Columns taken by the line-number gutter (`"%4d "`)
pub const GUTTER_WIDTH: usize = 5;

/// Columns available for text on a screen `screen_cols` wide
pub fn text_width(screen_cols: usize) -> usize {
    screen_cols.saturating_sub(GUTTER_WIDTH).max(1)
}

impl Buffer {
    /// Split the current row at the last space before the wrap width.
    ///
    /// No-op when hard wrap is off, the row fits, there is no space to break
    /// at, or nothing but whitespace follows the break. The whitespace at the
    /// break is dropped and the moved text starts on a new row below. A cursor
    /// past the break follows the moved text.
    pub fn apply_hard_wrap(&mut self) {
        let Some(width) = self.wrap_width else {
            return;
        };
        let Some(row) = self.rows.get(self.cy) else {
            return;
        };
        if row.rsize() <= width || row.size() == 0 {
            return;
        }

        let wrap_idx = rx_to_cx(&row.raw, width, self.tab_stop).min(row.size() - 1);
        let Some(brk) = row.raw[..=wrap_idx].iter().rposition(|&b| b == b' ') else {
            return;
        };
        let content_start = brk
            + row.raw[brk..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
        if content_start >= row.size() {
            return;
        }

        let before = self.cursor();
        let at = Point::new(brk, self.cy);

        let removed = self.delete_text(at, content_start - brk);
        self.record(ActionKind::Delete, at, removed, before, true);

        self.insert_text(at, b"\n");
        if self.cx > brk {
            self.cy += 1;
            self.cx = self.cx.saturating_sub(content_start);
        }
        self.record(ActionKind::Insert, at, b"\n".to_vec(), before, true);

        log::trace!("hard wrap at row {} col {}", at.cy, brk);
    }
}

/// Number of screen lines a row of display width `rsize` occupies
pub fn display_line_count(rsize: usize, width: usize) -> usize {
    rsize / width.max(1) + 1
}

/// Cut a row's rendered text into screen lines of `width` columns. Always
/// returns at least one (possibly empty) range.
pub fn display_lines(row: &Row, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    (0..display_line_count(row.rsize(), width))
        .map(|i| {
            let start = (i * width).min(row.rsize());
            let end = ((i + 1) * width).min(row.rsize());
            start..end
        })
        .collect()
}

/// Display line of the cursor in soft-wrap mode, counted from the top of the
/// document
pub fn cursor_display_line(buffer: &Buffer, width: usize) -> usize {
    let width = width.max(1);
    let above: usize = buffer
        .rows
        .iter()
        .take(buffer.cy)
        .map(|row| display_line_count(row.rsize(), width))
        .sum();
    above + buffer.rx / width
}
