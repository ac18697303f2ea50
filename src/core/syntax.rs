//! Syntax Highlighting Module
//!
//! Classifies each rendered byte of a row into a [`Highlight`] class using a
//! single left-to-right scan. The only state that survives a row boundary is
//! whether a multi-line comment is still open; the buffer threads that flag
//! from row to row and re-runs the scan forward whenever it changes.

use std::path::Path;

// =============================================================================
// HIGHLIGHT CLASSES
// =============================================================================

/// Syntactic category of one rendered byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    MlComment,
    Keyword1,
    Keyword2,
    String,
    Number,
    /// Current search match
    Match,
    /// Line-number gutter
    Gutter,
}

/// Display color category a highlight class is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorCategory {
    Normal,
    Comment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
    Gutter,
}

/// Map a highlight class to the color category the renderer paints it with
pub fn syntax_to_color(hl: Highlight) -> ColorCategory {
    match hl {
        Highlight::Comment | Highlight::MlComment => ColorCategory::Comment,
        Highlight::Keyword1 => ColorCategory::Keyword1,
        Highlight::Keyword2 => ColorCategory::Keyword2,
        Highlight::String => ColorCategory::String,
        Highlight::Number => ColorCategory::Number,
        Highlight::Match => ColorCategory::Match,
        Highlight::Gutter => ColorCategory::Gutter,
        Highlight::Normal => ColorCategory::Normal,
    }
}

// =============================================================================
// SYNTAX DEFINITIONS
// =============================================================================

/// Read-only description of one language.
///
/// `filematch` entries starting with `.` match the filename's extension
/// exactly; any other entry matches as a substring of the filename. Keywords
/// ending in `|` are secondary keywords (types, literals).
#[derive(Debug, PartialEq, Eq)]
pub struct SyntaxDefinition {
    pub filetype: &'static str,
    pub filematch: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub singleline_comment: Option<&'static str>,
    pub multiline_comment: Option<(&'static str, &'static str)>,
    pub highlight_numbers: bool,
    pub highlight_strings: bool,
}

static C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
    "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|", "char|",
    "unsigned|", "signed|", "void|",
];

static PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield", "async", "await", "True|",
    "False|", "None|", "str|", "int|", "float|", "list|", "tuple|", "dict|",
];

static JS_KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "export", "extends", "finally", "for", "function", "if", "import", "in",
    "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var",
    "void", "while", "with", "yield", "let|", "static|", "enum|", "await|", "implements|",
    "package|", "protected|", "interface|", "private|", "public|", "true|", "false|", "null|",
];

/// Built-in language table, searched in order
pub static SYNTAXES: &[SyntaxDefinition] = &[
    SyntaxDefinition {
        filetype: "c",
        filematch: &[".c", ".h", ".cpp"],
        keywords: C_KEYWORDS,
        singleline_comment: Some("//"),
        multiline_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
    SyntaxDefinition {
        filetype: "python",
        filematch: &[".py"],
        keywords: PYTHON_KEYWORDS,
        singleline_comment: Some("#"),
        multiline_comment: None,
        highlight_numbers: true,
        highlight_strings: true,
    },
    SyntaxDefinition {
        filetype: "javascript",
        filematch: &[".js"],
        keywords: JS_KEYWORDS,
        singleline_comment: Some("//"),
        multiline_comment: Some(("/*", "*/")),
        highlight_numbers: true,
        highlight_strings: true,
    },
];

/// Find the language for a filename: the first definition with a matching
/// extension entry or a substring entry contained in the name.
pub fn syntax_for_filename(filename: &Path) -> Option<&'static SyntaxDefinition> {
    let name = filename.to_string_lossy();
    let ext = name.rfind('.').map(|dot| &name[dot..]);

    SYNTAXES.iter().find(|syntax| {
        syntax.filematch.iter().any(|pattern| {
            if pattern.starts_with('.') {
                ext == Some(*pattern)
            } else {
                name.contains(pattern)
            }
        })
    })
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Separator bytes bound keywords and numbers
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0 || b",.()+-/*=~%<>[];".contains(&byte)
}

/// Classify one rendered row.
///
/// `in_comment` is the previous row's open-comment flag. Returns the highlight
/// array (one class per byte of `rendered`) and whether a multi-line comment is
/// still open at the end of the row.
pub fn classify(
    rendered: &[u8],
    syntax: Option<&SyntaxDefinition>,
    in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; rendered.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.singleline_comment.unwrap_or("").as_bytes();
    let (mcs, mce) = syntax
        .multiline_comment
        .map(|(start, end)| (start.as_bytes(), end.as_bytes()))
        .unwrap_or((b"", b""));

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = in_comment;

    let mut i = 0;
    while i < rendered.len() {
        let c = rendered[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };
        let rest = &rendered[i..];

        if !scs.is_empty() && in_string.is_none() && !in_comment && rest.starts_with(scs) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if !mcs.is_empty() && !mce.is_empty() && in_string.is_none() {
            if in_comment {
                hl[i] = Highlight::MlComment;
                if rest.starts_with(mce) {
                    hl[i..i + mce.len()].fill(Highlight::MlComment);
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    i += 1;
                }
                continue;
            } else if rest.starts_with(mcs) {
                hl[i..i + mcs.len()].fill(Highlight::MlComment);
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.highlight_strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < rendered.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.highlight_numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep {
            if let Some((len, class)) = match_keyword(rest, syntax.keywords) {
                hl[i..i + len].fill(class);
                i += len;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

/// Longest keyword at the start of `rest` that is followed by a separator
/// (or the end of the row).
fn match_keyword(rest: &[u8], keywords: &[&str]) -> Option<(usize, Highlight)> {
    keywords
        .iter()
        .filter_map(|keyword| {
            let (word, class) = match keyword.strip_suffix('|') {
                Some(word) => (word.as_bytes(), Highlight::Keyword2),
                None => (keyword.as_bytes(), Highlight::Keyword1),
            };
            let followed_by_separator = rest
                .get(word.len())
                .is_none_or(|&next| is_separator(next));
            (!word.is_empty() && rest.starts_with(word) && followed_by_separator)
                .then_some((word.len(), class))
        })
        .max_by_key(|(len, _)| *len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_syntax() -> &'static SyntaxDefinition {
        &SYNTAXES[0]
    }

    #[test]
    fn test_keywords_primary_and_secondary() {
        let (hl, open) = classify(b"int x; return", Some(c_syntax()), false);
        assert!(!open);
        assert_eq!(&hl[0..3], &[Highlight::Keyword2; 3]);
        assert_eq!(hl[4], Highlight::Normal);
        assert_eq!(&hl[7..13], &[Highlight::Keyword1; 6]);
    }

    #[test]
    fn test_keyword_needs_separator_after() {
        let (hl, _) = classify(b"intx", Some(c_syntax()), false);
        assert!(hl.iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_keyword_needs_separator_before() {
        let (hl, _) = classify(b"xif", Some(c_syntax()), false);
        assert!(hl.iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_numbers() {
        let (hl, _) = classify(b"x = 3.14;", Some(c_syntax()), false);
        assert_eq!(&hl[4..8], &[Highlight::Number; 4]);
        assert_eq!(hl[8], Highlight::Normal);

        // Digits glued to an identifier are not numbers
        let (hl, _) = classify(b"x1", Some(c_syntax()), false);
        assert_eq!(hl[1], Highlight::Normal);
    }

    #[test]
    fn test_strings_with_escapes() {
        let (hl, _) = classify(br#"s = "a\"b";"#, Some(c_syntax()), false);
        // s, space, =, space, then the 6-byte string literal
        assert_eq!(&hl[4..10], &[Highlight::String; 6]);
        assert_eq!(hl[10], Highlight::Normal);
    }

    #[test]
    fn test_single_line_comment_ends_scan() {
        let (hl, open) = classify(b"x; // if 1", Some(c_syntax()), false);
        assert!(!open);
        assert_eq!(&hl[3..], &[Highlight::Comment; 7]);
    }

    #[test]
    fn test_comment_token_inside_string_is_text() {
        let (hl, _) = classify(b"\"//\" x", Some(c_syntax()), false);
        assert_eq!(&hl[0..4], &[Highlight::String; 4]);
        assert_eq!(hl[5], Highlight::Normal);
    }

    #[test]
    fn test_multiline_comment_open_and_close() {
        let (hl, open) = classify(b"a /* b", Some(c_syntax()), false);
        assert!(open);
        assert_eq!(&hl[2..], &[Highlight::MlComment; 4]);

        let (hl, open) = classify(b"b */ if", Some(c_syntax()), true);
        assert!(!open);
        assert_eq!(&hl[0..4], &[Highlight::MlComment; 4]);
        assert_eq!(&hl[5..7], &[Highlight::Keyword1; 2]);
    }

    #[test]
    fn test_python_has_no_multiline_comments() {
        let python = &SYNTAXES[1];
        let (hl, open) = classify(b"/* x # c", Some(python), false);
        assert!(!open);
        assert_eq!(hl[0], Highlight::Normal);
        assert_eq!(&hl[5..], &[Highlight::Comment; 3]);
    }

    #[test]
    fn test_no_syntax_is_all_normal() {
        let (hl, open) = classify(b"int /* x", None, true);
        assert!(!open);
        assert!(hl.iter().all(|&h| h == Highlight::Normal));
    }

    #[test]
    fn test_syntax_for_filename() {
        assert_eq!(
            syntax_for_filename(Path::new("main.c")).map(|s| s.filetype),
            Some("c")
        );
        assert_eq!(
            syntax_for_filename(Path::new("dir.v2/script.py")).map(|s| s.filetype),
            Some("python")
        );
        assert_eq!(
            syntax_for_filename(Path::new("app.js")).map(|s| s.filetype),
            Some("javascript")
        );
        assert!(syntax_for_filename(Path::new("notes.txt")).is_none());
        assert!(syntax_for_filename(Path::new("Makefile")).is_none());
    }

    #[test]
    fn test_syntax_to_color() {
        assert_eq!(syntax_to_color(Highlight::MlComment), ColorCategory::Comment);
        assert_eq!(syntax_to_color(Highlight::Comment), ColorCategory::Comment);
        assert_eq!(syntax_to_color(Highlight::Normal), ColorCategory::Normal);
        assert_eq!(syntax_to_color(Highlight::Match), ColorCategory::Match);
    }

    #[test]
    fn test_is_separator() {
        for &b in b" \t,.()+-/*=~%<>[];\0" {
            assert!(is_separator(b), "{:?} should separate", b as char);
        }
        for &b in b"a_Z9\"{" {
            assert!(!is_separator(b));
        }
    }
}
