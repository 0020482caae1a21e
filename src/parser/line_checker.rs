//! Line classification predicates.
//!
//! The block parser decides what construct a line starts by asking these
//! checks in a fixed priority order. They are pure functions over single
//! lines; multi-line decisions (titles, definition terms) are made by the
//! document parser with its lookahead.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that may form title underlines and separators.
pub const HEADER_LETTERS: [char; 13] = [
    '=', '-', '~', '*', '+', '^', '"', '.', '`', '\'', '_', '#', ':',
];

/// Bullet or enumerated list marker at the start of a line: the marker
/// itself, then the item text.
static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([-+*\x{2022}\x{2023}\x{2043}]|(?:\d+|#)[.)]|\((?:\d+|#)\))(?:\s+(.*)|\s*$)")
        .unwrap()
});

/// Directive line: `.. name::`, optionally with a `|variable|` and data.
static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.\. (?:\|([^|]+)\| )?([^\s]+)::(?: (.*))?$").unwrap());

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\.(?: (.*))?$").unwrap());

/// A parsed list marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    pub prefix: String,
    pub ordered: bool,
    pub text: String,
    /// Character offset of the item text within the line.
    pub offset: usize,
}

/// The letter of a special line: at least two identical header letters.
pub fn special_letter(line: &str) -> Option<char> {
    let line = line.trim_end();
    let mut chars = line.chars();
    let first = chars.next()?;

    if !HEADER_LETTERS.contains(&first) || line.chars().count() < 2 {
        return None;
    }

    chars.all(|c| c == first).then_some(first)
}

/// Does `underline` make the preceding `text` line a title?
pub fn is_title_underline(text: &str, underline: &str) -> bool {
    if special_letter(underline).is_none() {
        return false;
    }

    let text = text.trim_end();

    !text.is_empty()
        && !is_block_line(text)
        && special_letter(text).is_none()
        && underline.trim_end().chars().count() >= text.chars().count()
}

pub fn parse_list_marker(line: &str) -> Option<ListLine> {
    let caps = LIST_MARKER_RE.captures(line)?;
    let prefix = caps[1].to_string();
    let text = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let ordered = prefix.chars().next().map_or(false, |c| {
        c.is_ascii_digit() || c == '#' || c == '('
    });
    let offset = line.chars().count() - text.chars().count();

    Some(ListLine {
        prefix,
        ordered,
        text,
        offset,
    })
}

pub fn is_directive(line: &str) -> bool {
    DIRECTIVE_RE.is_match(line)
}

pub(crate) fn directive_regex() -> &'static Regex {
    &DIRECTIVE_RE
}

/// Comment lines look like directives without the `::` marker.
pub fn is_comment(line: &str) -> bool {
    COMMENT_RE.is_match(line) && !is_directive(line)
}

/// Blank or indented, i.e. part of an indented block.
pub fn is_block_line(line: &str) -> bool {
    line.trim().is_empty() || is_indented(line, 1)
}

pub fn is_indented(line: &str, indent: usize) -> bool {
    indent > 0 && line.chars().take(indent).filter(|c| *c == ' ').count() == indent
}

/// Width of the leading space run.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_letter() {
        assert_eq!(special_letter("====="), Some('='));
        assert_eq!(special_letter("--"), Some('-'));
        assert_eq!(special_letter("-"), None);
        assert_eq!(special_letter("=-="), None);
        assert_eq!(special_letter("abc"), None);
        assert_eq!(special_letter(""), None);
    }

    #[test]
    fn test_title_underline_must_cover_text() {
        assert!(is_title_underline("Title", "====="));
        assert!(is_title_underline("Title", "========"));
        assert!(!is_title_underline("A longer title", "====="));
        assert!(!is_title_underline("   indented", "====="));
        assert!(!is_title_underline("-----", "-----"));
    }

    #[test]
    fn test_list_markers() {
        let bullet = parse_list_marker("- item text").unwrap();
        assert_eq!(bullet.prefix, "-");
        assert!(!bullet.ordered);
        assert_eq!(bullet.text, "item text");
        assert_eq!(bullet.offset, 2);

        let numbered = parse_list_marker("12. item").unwrap();
        assert_eq!(numbered.prefix, "12.");
        assert!(numbered.ordered);

        let auto = parse_list_marker("#) item").unwrap();
        assert!(auto.ordered);

        assert!(parse_list_marker("not a list").is_none());
        assert!(parse_list_marker("-dash-word").is_none());
    }

    #[test]
    fn test_directive_and_comment() {
        assert!(is_directive(".. note::"));
        assert!(is_directive(".. code-block:: php"));
        assert!(is_directive(".. |label| replace:: text"));
        assert!(!is_directive(".. just a comment"));
        assert!(is_comment(".. just a comment"));
        assert!(is_comment(".."));
        assert!(!is_comment(".. note::"));
    }

    #[test]
    fn test_indentation() {
        assert!(is_indented("    code", 4));
        assert!(is_indented("  a", 2));
        assert!(!is_indented("a", 1));
        assert_eq!(indent_of("   x"), 3);
        assert!(is_block_line(""));
        assert!(is_block_line("  x"));
        assert!(!is_block_line("x"));
    }
}
