//! Structured single-line parsers.
//!
//! Link and anchor definition lines, directive lines and directive option
//! lines each carry structured data; this module extracts it. What to do
//! with the result is the document parser's business.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::line_checker::directive_regex;

// Order matters: URL forms must be tried before bare anchors.
static QUOTED_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.\. _`(.+?)`: (.+)$").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\. _(.+?): (.+)$").unwrap());
static ANONYMOUS_LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^__ (.+)$").unwrap());
static QUOTED_ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\. _`(.+)`:$").unwrap());
static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\. _(.+):$").unwrap());

static OPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+:([^:]+):(?:\s+(.*))?\s*$").unwrap());

/// A link or anchor definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkLine {
    /// `.. _name: url` or `__ url` (anonymous, name `_`).
    Link { name: String, url: String },
    /// `.. _name:` pointing at the spot it is written.
    Anchor { name: String },
}

pub fn parse_link(line: &str) -> Option<LinkLine> {
    let line = line.trim_end();

    for re in [&*QUOTED_LINK_RE, &*LINK_RE] {
        if let Some(caps) = re.captures(line) {
            return Some(LinkLine::Link {
                name: caps[1].to_string(),
                url: caps[2].to_string(),
            });
        }
    }

    if let Some(caps) = ANONYMOUS_LINK_RE.captures(line) {
        return Some(LinkLine::Link {
            name: "_".to_string(),
            url: caps[1].to_string(),
        });
    }

    for re in [&*QUOTED_ANCHOR_RE, &*ANCHOR_RE] {
        if let Some(caps) = re.captures(line) {
            return Some(LinkLine::Anchor {
                name: caps[1].to_string(),
            });
        }
    }

    None
}

/// The opening line of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveLine {
    /// `|name|` when the directive result is stored as a variable.
    pub variable: Option<String>,
    pub name: String,
    /// Text after the `::` marker.
    pub data: String,
}

pub fn parse_directive_line(line: &str) -> Option<DirectiveLine> {
    let caps = directive_regex().captures(line.trim_end())?;

    Some(DirectiveLine {
        variable: caps.get(1).map(|m| m.as_str().to_string()),
        name: caps[2].to_string(),
        data: caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    })
}

/// An indented `:key: value` option line; flags have no value.
pub fn parse_directive_option(line: &str) -> Option<(String, Option<String>)> {
    let caps = OPTION_RE.captures(line)?;

    Some((
        caps[1].to_string(),
        caps.get(2).map(|m| m.as_str().trim().to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_definitions() {
        assert_eq!(
            parse_link(".. _target: https://example.com"),
            Some(LinkLine::Link {
                name: "target".into(),
                url: "https://example.com".into()
            })
        );
        assert_eq!(
            parse_link(".. _`multi word`: https://example.com"),
            Some(LinkLine::Link {
                name: "multi word".into(),
                url: "https://example.com".into()
            })
        );
        assert_eq!(
            parse_link("__ https://example.com"),
            Some(LinkLine::Link {
                name: "_".into(),
                url: "https://example.com".into()
            })
        );
    }

    #[test]
    fn test_anchor_definitions() {
        assert_eq!(
            parse_link(".. _target:"),
            Some(LinkLine::Anchor {
                name: "target".into()
            })
        );
        assert_eq!(
            parse_link(".. _`multi word`:"),
            Some(LinkLine::Anchor {
                name: "multi word".into()
            })
        );
        assert_eq!(parse_link(".. note:: text"), None);
        assert_eq!(parse_link("plain text"), None);
    }

    #[test]
    fn test_directive_lines() {
        let line = parse_directive_line(".. code-block:: php").unwrap();
        assert_eq!(line.name, "code-block");
        assert_eq!(line.data, "php");
        assert_eq!(line.variable, None);

        let line = parse_directive_line(".. |label| replace:: some text").unwrap();
        assert_eq!(line.variable.as_deref(), Some("label"));
        assert_eq!(line.name, "replace");
        assert_eq!(line.data, "some text");

        let line = parse_directive_line(".. note::").unwrap();
        assert_eq!(line.name, "note");
        assert_eq!(line.data, "");

        assert!(parse_directive_line(".. not a directive").is_none());
    }

    #[test]
    fn test_directive_options() {
        assert_eq!(
            parse_directive_option("   :align: center"),
            Some(("align".into(), Some("center".into())))
        );
        assert_eq!(
            parse_directive_option("   :number-lines:"),
            Some(("number-lines".into(), None))
        );
        assert_eq!(parse_directive_option("plain"), None);
        assert_eq!(parse_directive_option("   indented text"), None);
    }
}
