//! Inline span token types.
//!
//! The span parser replaces literal spans, cross-references and links with
//! unique placeholder IDs and records one [`SpanToken`] per replacement. The
//! tokens are carried on the resulting span node and substituted back by the
//! per-format span renderers at render time.

use std::fmt;

/// What a placeholder stands for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SpanTokenData {
    /// Verbatim inline text from a ``double-backtick`` literal span.
    Literal { text: String },

    /// A named or anonymous hyperlink. `url` is empty when the target is
    /// declared elsewhere and has to be looked up in the environment link
    /// table at render time.
    Link { link: String, url: String },

    /// A role/cross-reference such as `` :doc:`page` `` or
    /// `` :php:class:`Name` ``; resolved through the reference registry at
    /// render time.
    Reference {
        domain: Option<String>,
        section: String,
        url: String,
        text: Option<String>,
        anchor: Option<String>,
    },
}

impl SpanTokenData {
    /// Short kind name, used in diagnostics and snapshots.
    pub fn kind(&self) -> &'static str {
        match self {
            SpanTokenData::Literal { .. } => "literal",
            SpanTokenData::Link { .. } => "link",
            SpanTokenData::Reference { .. } => "reference",
        }
    }
}

impl fmt::Display for SpanTokenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

/// A placeholder ID together with the inline content it stands for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpanToken {
    pub id: String,
    pub data: SpanTokenData,
}

impl SpanToken {
    pub fn new(id: impl Into<String>, data: SpanTokenData) -> Self {
        Self { id: id.into(), data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_names() {
        let literal = SpanTokenData::Literal { text: "x".into() };
        let link = SpanTokenData::Link { link: "x".into(), url: String::new() };
        assert_eq!(literal.kind(), "literal");
        assert_eq!(format!("{}", link), "link");
    }
}
