//! Terminal color definitions and ANSI conversion
//!
//! Provides the Color enum used by TUI rendering and the mapping from
//! highlight color categories to it.

use crate::core::syntax::ColorCategory;

/// Terminal foreground color (8-color ANSI palette)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Reset,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Convert Color enum to ANSI foreground color code
    pub fn to_ansi_fg_code(self) -> &'static str {
        match self {
            Color::Reset => "39",
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Magenta => "35",
            Color::Cyan => "36",
            Color::White => "37",
        }
    }

    /// Palette entry a color category is drawn with
    pub fn for_category(category: ColorCategory) -> Self {
        match category {
            ColorCategory::Comment => Color::Cyan,
            ColorCategory::Keyword1 => Color::Yellow,
            ColorCategory::Keyword2 => Color::Green,
            ColorCategory::String => Color::Magenta,
            ColorCategory::Number => Color::Red,
            ColorCategory::Match => Color::Blue,
            ColorCategory::Gutter | ColorCategory::Normal => Color::Reset,
        }
    }
}
