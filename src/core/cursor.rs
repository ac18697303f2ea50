//! Cursor movement and viewport scrolling

use crate::core::buffer::Buffer;
use crate::core::row::cx_to_rx;
use crate::core::wrap;

/// Arrow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Size of the text area on screen: rows available for text (status and
/// message bars excluded) and the full screen width including the gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Columns left for text once the gutter is drawn
    pub fn text_width(&self) -> usize {
        wrap::text_width(self.cols)
    }
}

impl Buffer {
    /// Move one step. Left at column 0 wraps to the end of the previous row,
    /// right at the end of a row wraps to the start of the next. The column is
    /// clamped to the length of the row the cursor ends up on.
    pub fn move_cursor(&mut self, direction: Direction) {
        let row_len = self.rows.get(self.cy).map(|r| r.size());

        match direction {
            Direction::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = self.row_len(self.cy);
                }
            }
            Direction::Right => match row_len {
                Some(len) if self.cx < len => self.cx += 1,
                Some(_) => {
                    self.cy += 1;
                    self.cx = 0;
                }
                None => {}
            },
            Direction::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Direction::Down => {
                if self.cy < self.numrows() {
                    self.cy += 1;
                }
            }
        }

        self.cx = self.cx.min(self.row_len(self.cy));
    }

    pub fn move_home(&mut self) {
        self.cx = 0;
    }

    pub fn move_end(&mut self) {
        if self.cy < self.numrows() {
            self.cx = self.row_len(self.cy);
        }
    }

    /// Page Up/Down: jump to the top or bottom of the screen, then move a
    /// full screen further.
    pub fn page(&mut self, direction: Direction, viewport: Viewport) {
        let step = match direction {
            Direction::Up => {
                self.cy = self.rowoff.min(self.numrows());
                Direction::Up
            }
            _ => {
                self.cy = (self.rowoff + viewport.rows)
                    .saturating_sub(1)
                    .min(self.numrows());
                Direction::Down
            }
        };
        for _ in 0..viewport.rows {
            self.move_cursor(step);
        }
    }

    /// Refresh `rx` and adjust the viewport offsets so the cursor is visible.
    ///
    /// With soft wrap there is no horizontal scrolling and `rowoff` counts
    /// screen lines instead of rows.
    pub fn scroll(&mut self, viewport: Viewport, soft_wrap: bool) {
        self.rx = self
            .rows
            .get(self.cy)
            .map_or(0, |row| cx_to_rx(&row.raw, self.cx, self.tab_stop));

        let width = viewport.text_width();
        let screen_rows = viewport.rows.max(1);

        if soft_wrap {
            self.coloff = 0;
            let display_y = wrap::cursor_display_line(self, width);
            if display_y < self.rowoff {
                self.rowoff = display_y;
            }
            if display_y >= self.rowoff + screen_rows {
                self.rowoff = display_y + 1 - screen_rows;
            }
            return;
        }

        if self.cy < self.rowoff {
            self.rowoff = self.cy;
        }
        if self.cy >= self.rowoff + screen_rows {
            self.rowoff = self.cy + 1 - screen_rows;
        }
        if self.rx < self.coloff {
            self.coloff = self.rx;
        }
        if self.rx >= self.coloff + width {
            self.coloff = self.rx + 1 - width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::Point;

    #[test]
    fn test_left_wraps_to_previous_row_end() {
        let mut buffer = Buffer::from_lines(["abc", "d"]);
        buffer.set_cursor(Point::new(0, 1));
        buffer.move_cursor(Direction::Left);
        assert_eq!(buffer.cursor(), Point::new(3, 0));
    }

    #[test]
    fn test_right_wraps_to_next_row_and_virtual_row() {
        let mut buffer = Buffer::from_lines(["ab"]);
        buffer.set_cursor(Point::new(2, 0));
        buffer.move_cursor(Direction::Right);
        assert_eq!(buffer.cursor(), Point::new(0, 1));
        // No further on the virtual row
        buffer.move_cursor(Direction::Right);
        assert_eq!(buffer.cursor(), Point::new(0, 1));
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut buffer = Buffer::from_lines(["long line", "ab"]);
        buffer.set_cursor(Point::new(7, 0));
        buffer.move_cursor(Direction::Down);
        assert_eq!(buffer.cursor(), Point::new(2, 1));
        buffer.move_cursor(Direction::Down);
        assert_eq!(buffer.cursor(), Point::new(0, 2));
        buffer.move_cursor(Direction::Down);
        assert_eq!(buffer.cy, 2);
        buffer.move_cursor(Direction::Up);
        buffer.move_cursor(Direction::Up);
        buffer.move_cursor(Direction::Up);
        assert_eq!(buffer.cursor(), Point::new(0, 0));
    }

    #[test]
    fn test_home_end() {
        let mut buffer = Buffer::from_lines(["hello"]);
        buffer.move_end();
        assert_eq!(buffer.cx, 5);
        buffer.move_home();
        assert_eq!(buffer.cx, 0);
    }

    #[test]
    fn test_page_down_and_up() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut buffer = Buffer::from_lines(&lines);
        let viewport = Viewport::new(10, 80);

        buffer.page(Direction::Down, viewport);
        assert_eq!(buffer.cy, 19);
        buffer.scroll(viewport, false);
        assert_eq!(buffer.rowoff, 10);

        buffer.page(Direction::Up, viewport);
        assert_eq!(buffer.cy, 0);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut buffer = Buffer::from_lines(["\tx".repeat(20)]);
        let viewport = Viewport::new(5, 25);
        buffer.set_cursor(Point::new(3, 0));
        buffer.scroll(viewport, false);
        assert_eq!(buffer.rx, 16);
        assert_eq!(buffer.coloff, 0);

        buffer.move_end();
        buffer.scroll(viewport, false);
        // Each "\tx" pair after the first ends one column past a tab stop
        assert_eq!(buffer.rx, 161);
        assert_eq!(buffer.coloff, 142);
    }

    #[test]
    fn test_scroll_soft_wrap_counts_screen_lines() {
        let mut buffer = Buffer::from_lines(["a".repeat(25), "b".to_string(), "c".to_string()]);
        // Text width 10: row 0 takes three screen lines
        let viewport = Viewport::new(2, 15);
        buffer.set_cursor(Point::new(0, 2));
        buffer.scroll(viewport, true);
        assert_eq!(buffer.rowoff, 3);
        assert_eq!(buffer.coloff, 0);
    }
}
