//! Terminal rendering module
//!
//! A frame is composed from the editor state as plain lines carrying ANSI
//! attribute sequences, then written out with crossterm cursor control.
//! Composition is pure so it can be checked without a terminal.

use std::io::Write;
use std::ops::Range;

use crossterm::{QueueableCommand, cursor, terminal};

use crate::core::app::EditorApp;
use crate::core::buffer::{Buffer, Point};
use crate::core::row::{Row, rx_to_cx};
use crate::core::syntax::{Highlight, syntax_to_color};
use crate::core::wrap::{self, GUTTER_WIDTH};
use crate::error::Result;
use crate::terminal::color::Color;

const RESET: &str = "\x1b[0m";
const REVERSE: &str = "\x1b[7m";
const DIM: &str = "\x1b[2m";

/// One composed screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    /// Cursor position as (column, row)
    pub cursor: (u16, u16),
}

/// Scroll the current buffer, compose a frame and draw it
pub fn refresh(app: &mut EditorApp, out: &mut impl Write) -> Result<()> {
    app.scroll();
    let frame = compose(app);
    draw(&frame, out)
}

/// Write a frame to the terminal
pub fn draw(frame: &Frame, out: &mut impl Write) -> Result<()> {
    out.queue(cursor::Hide)?;
    for (y, line) in frame.lines.iter().enumerate() {
        out.queue(cursor::MoveTo(0, clamp_u16(y)))?;
        out.write_all(line.as_bytes())?;
        out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    }
    out.queue(cursor::MoveTo(frame.cursor.0, frame.cursor.1))?;
    out.queue(cursor::Show)?;
    out.flush()?;
    Ok(())
}

/// Compose the text area, status bar and message bar
pub fn compose(app: &EditorApp) -> Frame {
    let buffer = app.buffer();
    let viewport = app.viewport;
    let width = viewport.text_width();

    let mut lines = if app.settings.soft_wrap {
        wrapped_rows(buffer, viewport.rows, width)
    } else {
        plain_rows(buffer, viewport.rows, viewport.cols, width)
    };
    lines.push(status_bar(app, viewport.cols));
    lines.push(
        app.status_message()
            .map(|msg| msg.chars().take(viewport.cols).collect())
            .unwrap_or_default(),
    );

    let (cx, cy) = if app.settings.soft_wrap {
        let display_y = wrap::cursor_display_line(buffer, width);
        (
            buffer.rx % width + GUTTER_WIDTH,
            display_y.saturating_sub(buffer.rowoff),
        )
    } else {
        (
            buffer.rx.saturating_sub(buffer.coloff) + GUTTER_WIDTH,
            buffer.cy.saturating_sub(buffer.rowoff),
        )
    };

    Frame {
        lines,
        cursor: (clamp_u16(cx), clamp_u16(cy)),
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ===== TEXT AREA =====

fn plain_rows(buffer: &Buffer, screen_rows: usize, screen_cols: usize, width: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(screen_rows + 2);
    for y in 0..screen_rows {
        let filerow = y + buffer.rowoff;
        let Some(row) = buffer.rows.get(filerow) else {
            if buffer.numrows() == 0 && y == screen_rows / 3 {
                lines.push(welcome(screen_cols));
            } else {
                lines.push("~".to_string());
            }
            continue;
        };

        let mut line = gutter(&format!("{:>4} ", filerow + 1));
        let start = buffer.coloff.min(row.rsize());
        let end = (buffer.coloff + width).min(row.rsize());
        paint(&mut line, buffer, row, start..end);
        lines.push(line);
    }
    lines
}

fn wrapped_rows(buffer: &Buffer, screen_rows: usize, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = buffer
        .rows
        .iter()
        .flat_map(|row| {
            wrap::display_lines(row, width)
                .into_iter()
                .enumerate()
                .map(move |(i, range)| (row, i, range))
        })
        .skip(buffer.rowoff)
        .take(screen_rows)
        .map(|(row, i, range)| {
            let mut line = if i == 0 {
                gutter(&format!("{:>4} ", row.index + 1))
            } else {
                gutter("   . ")
            };
            paint(&mut line, buffer, row, range);
            line
        })
        .collect();

    lines.resize(screen_rows, "~".to_string());
    lines
}

fn welcome(screen_cols: usize) -> String {
    let text = format!("Tabula editor -- version {}", env!("CARGO_PKG_VERSION"));
    let text: String = text.chars().take(screen_cols).collect();
    let padding = (screen_cols - text.len()) / 2;
    let mut line = String::new();
    if padding > 0 {
        line.push('~');
        line.push_str(&" ".repeat(padding - 1));
    }
    line.push_str(&text);
    line
}

fn gutter(label: &str) -> String {
    format!("{}{}{}", DIM, label, RESET)
}

/// Append the rendered columns `range` of `row`, colored by highlight class.
/// Selected bytes are drawn in reverse video and anything outside printable
/// ASCII as `?`.
fn paint(line: &mut String, buffer: &Buffer, row: &Row, range: Range<usize>) {
    let selection = buffer.selection_span();
    let mut current: Option<(Color, bool)> = None;

    for rx in range {
        let byte = row.rendered[rx];
        let hl = row.highlight.get(rx).copied().unwrap_or(Highlight::Normal);
        let selected = selection.is_some_and(|(start, end)| {
            let cx = rx_to_cx(&row.raw, rx, buffer.tab_stop);
            (start..end).contains(&Point::new(cx, row.index))
        });
        let style = (Color::for_category(syntax_to_color(hl)), selected);

        if current != Some(style) {
            line.push_str(RESET);
            if selected {
                line.push_str(REVERSE);
            }
            line.push_str("\x1b[");
            line.push_str(style.0.to_ansi_fg_code());
            line.push('m');
            current = Some(style);
        }

        line.push(if (0x20..0x7f).contains(&byte) {
            byte as char
        } else {
            '?'
        });
    }
    if current.is_some() {
        line.push_str(RESET);
    }
}

// ===== BARS =====

fn status_bar(app: &EditorApp, screen_cols: usize) -> String {
    let (left, right) = app.status_bar();
    let right = format!(" {}", right);

    let mut bar: String = left.chars().take(screen_cols).collect();
    let used = bar.chars().count();
    let right_len = right.chars().count();
    if used + right_len <= screen_cols {
        bar.push_str(&" ".repeat(screen_cols - used - right_len));
        bar.push_str(&right);
    } else {
        bar.push_str(&" ".repeat(screen_cols - used));
    }
    format!("{}{}{}", REVERSE, bar, RESET)
}
