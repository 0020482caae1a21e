//! Inline span parser.
//!
//! [`SpanParser::process`] runs the staged replacement pipeline over one span
//! of inline text:
//!
//! 1. literal spans (``double backticks``) become placeholder IDs,
//! 2. role references (`` :role:`target` ``) become placeholder IDs,
//! 3. the token pass resolves hyperlink reference syntax,
//! 4. standalone URLs and email addresses become placeholder IDs.
//!
//! Each placeholder is a 16-digit hex ID unique for the process lifetime, so
//! no later stage (or the renderer's emphasis handling) can corrupt a
//! replacement made by an earlier one. The recorded [`SpanToken`]s travel with
//! the processed text and are substituted back at render time.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::environment::Environment;
use crate::references::ReferenceRegistry;
use crate::span::lexer::{SpanLexer, TokenKind};
use crate::span::tokens::{SpanToken, SpanTokenData};

/// `:domain:section:` or `:section:` role followed by backticked content.
static ROLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":(?:([a-zA-Z0-9]+):)?([a-zA-Z0-9]+):`((?s).+?)`").unwrap()
});

/// `Link text <url>` inside a role or phrase reference.
static TEXT_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?s)(.+?)<(.+?)>$").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// John Gruber's liberal URL pattern.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b((?:[a-z][\w\-+.]+:(?:/{1,3}|[a-z0-9%]))(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .unwrap()
});

/// Dot-atom email addresses.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b([a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)\b",
    )
    .unwrap()
});

static PARSER_SEQUENCE: AtomicUsize = AtomicUsize::new(0);

/// Staged inline parser for a single span.
///
/// One parser instance handles one span; the recorded tokens are taken with
/// [`SpanParser::into_tokens`] once processing is done.
pub struct SpanParser {
    tokens: Vec<SpanToken>,
    token_id: usize,
    prefix: String,
}

impl Default for SpanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SpanParser {
    pub fn new() -> Self {
        let sequence = PARSER_SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self {
            tokens: Vec::new(),
            token_id: 0,
            prefix: format!("{}|", sequence),
        }
    }

    /// Run all replacement stages over `span` and return the processed text.
    pub fn process(
        &mut self,
        environment: &mut Environment,
        references: &ReferenceRegistry,
        span: &str,
    ) -> String {
        let text = self.replace_literals(span);
        let text = self.replace_references(environment, references, &text);
        let text = self.parse_tokens(environment, &text);
        let text = self.replace_standalone_hyperlinks(&text);
        self.replace_standalone_emails(&text)
    }

    pub fn tokens(&self) -> &[SpanToken] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<SpanToken> {
        self.tokens
    }

    /// Replace ``literal spans`` with placeholders.
    ///
    /// The closing delimiter is the first `` `` `` that is not followed by a
    /// third backtick, matching the reference syntax rule that a literal may
    /// contain single backticks.
    fn replace_literals(&mut self, span: &str) -> String {
        let mut out = String::with_capacity(span.len());
        let mut rest = span;

        loop {
            let open = match rest.find("``") {
                Some(open) => open,
                None => {
                    out.push_str(rest);
                    return out;
                }
            };

            let mut close = None;
            let mut from = open + 2;
            while let Some(offset) = rest[from..].find("``") {
                let at = from + offset;
                let next = rest[at + 2..].chars().next();
                if at > open + 2 && next != Some('`') {
                    close = Some(at);
                    break;
                }
                from = at + 1;
            }

            match close {
                Some(close) => {
                    out.push_str(&rest[..open]);
                    let id = self.add_token(SpanTokenData::Literal {
                        text: rest[open + 2..close].to_string(),
                    });
                    out.push_str(&id);
                    rest = &rest[close + 2..];
                }
                None => {
                    // Unterminated literal, keep the delimiter as text.
                    out.push_str(&rest[..open + 2]);
                    rest = &rest[open + 2..];
                }
            }
        }
    }

    /// Replace `` :role:`content` `` cross-references with placeholders and
    /// announce each one to the reference registry.
    fn replace_references(
        &mut self,
        environment: &mut Environment,
        references: &ReferenceRegistry,
        span: &str,
    ) -> String {
        ROLE_RE
            .replace_all(span, |caps: &Captures| {
                let domain = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .filter(|d| !d.is_empty());
                let section = caps[2].to_string();
                let content = &caps[3];

                let (text, url) = match TEXT_URL_RE.captures(content) {
                    Some(inner) => (
                        Some(inner[1].trim().to_string()),
                        inner[2].trim().to_string(),
                    ),
                    None => (None, content.trim().to_string()),
                };

                let (url, anchor) = match url.split_once('#') {
                    Some((before, after)) if !before.is_empty() && !after.is_empty() => {
                        (before.to_string(), Some(after.to_string()))
                    }
                    _ => (url, None),
                };

                references.found(environment, domain.as_deref(), &section, &url);

                self.add_token(SpanTokenData::Reference {
                    domain,
                    section,
                    url,
                    text,
                    anchor,
                })
            })
            .into_owned()
    }

    /// Token pass: hyperlink reference syntax.
    fn parse_tokens(&mut self, environment: &mut Environment, span: &str) -> String {
        let mut lexer = SpanLexer::new(span);
        let mut result = String::with_capacity(span.len());

        while let Some(token) = lexer.current().cloned() {
            match token.kind {
                TokenKind::NamedReference => {
                    let link = token.value.trim_end_matches('_');
                    let id = self.create_named_reference(environment, link, None);
                    result.push_str(&id);
                }
                TokenKind::AnonymousReference => {
                    let link = token.value.trim_end_matches('_');
                    let id = self.create_anonymous_reference(environment, link, None);
                    result.push_str(&id);
                }
                TokenKind::InternalReferenceStart => {
                    let parsed = self.parse_internal_reference(environment, &mut lexer);
                    result.push_str(&parsed);
                }
                TokenKind::Backtick => {
                    let parsed = self.parse_phrase_reference(environment, &mut lexer);
                    result.push_str(&parsed);
                }
                TokenKind::EscapedUnderscore => result.push('_'),
                _ => result.push_str(&token.value),
            }

            lexer.advance();
        }

        result
    }

    /// `` _`target` `` - internal reference target.
    ///
    /// Without a closing backtick the accumulated text is returned verbatim.
    fn parse_internal_reference(
        &mut self,
        environment: &mut Environment,
        lexer: &mut SpanLexer,
    ) -> String {
        let mut text = String::new();

        lexer.advance();
        while let Some(token) = lexer.current().cloned() {
            if token.kind == TokenKind::Backtick {
                return self.create_named_reference(environment, &text, None);
            }

            text.push_str(&token.value);
            lexer.advance();
        }

        text
    }

    /// Phrase reference starting at a backtick: `` `text`_ ``,
    /// `` `text`__ `` or `` `text <url>`_ ``.
    ///
    /// When no terminator is found before the end of the span, the lexer is
    /// restored to the opening backtick and the backtick itself is emitted as
    /// plain text.
    fn parse_phrase_reference(
        &mut self,
        environment: &mut Environment,
        lexer: &mut SpanLexer,
    ) -> String {
        let start = lexer.checkpoint();
        let mut text = String::new();
        let mut url: Option<String> = None;

        lexer.advance();
        while let Some(token) = lexer.current().cloned() {
            match token.kind {
                TokenKind::NamedReferenceEnd => {
                    return self.create_named_reference(environment, &text, url.as_deref());
                }
                TokenKind::PhraseAnonymousEnd => {
                    return self.create_anonymous_reference(environment, &text, url.as_deref());
                }
                TokenKind::EmbeddedUrlStart => match self.parse_embedded_url(lexer) {
                    Some(embedded) => url = Some(embedded),
                    None => text.push('<'),
                },
                _ => text.push_str(&token.value),
            }

            lexer.advance();
        }

        lexer.restore(start);
        "`".to_string()
    }

    /// `<url>` inside a phrase reference. `None` restores the lexer to the
    /// opening `<`.
    fn parse_embedded_url(&mut self, lexer: &mut SpanLexer) -> Option<String> {
        let start = lexer.checkpoint();
        let mut url = String::new();

        lexer.advance();
        while let Some(token) = lexer.current().cloned() {
            if token.kind == TokenKind::EmbeddedUrlEnd {
                return Some(url);
            }

            url.push_str(&token.value);
            lexer.advance();
        }

        lexer.restore(start);
        None
    }

    /// Bare URLs in running text.
    fn replace_standalone_hyperlinks(&mut self, span: &str) -> String {
        URL_RE
            .replace_all(span, |caps: &Captures| {
                let url = caps[1].to_string();
                self.add_token(SpanTokenData::Link {
                    link: url.clone(),
                    url,
                })
            })
            .into_owned()
    }

    /// Bare email addresses in running text.
    fn replace_standalone_emails(&mut self, span: &str) -> String {
        EMAIL_RE
            .replace_all(span, |caps: &Captures| {
                let email = caps[1].to_string();
                self.add_token(SpanTokenData::Link {
                    url: format!("mailto:{}", email),
                    link: email,
                })
            })
            .into_owned()
    }

    fn create_named_reference(
        &mut self,
        environment: &mut Environment,
        link: &str,
        url: Option<&str>,
    ) -> String {
        let mut link = WHITESPACE_RE.replace_all(link.trim(), " ").into_owned();

        if link.is_empty() {
            if let Some(url) = url {
                link = url.to_string();
            }
        }

        if let Some(url) = url {
            environment.set_link(&link, url);
        }

        self.add_token(SpanTokenData::Link {
            link,
            url: url.unwrap_or("").to_string(),
        })
    }

    fn create_anonymous_reference(
        &mut self,
        environment: &mut Environment,
        link: &str,
        url: Option<&str>,
    ) -> String {
        environment.reset_anonymous_stack();
        let id = self.create_named_reference(environment, link, url);
        environment.push_anonymous(link);
        id
    }

    fn add_token(&mut self, data: SpanTokenData) -> String {
        let id = self.generate_id();
        self.tokens.push(SpanToken::new(id.clone(), data));
        id
    }

    /// Placeholder IDs hash a per-parser prefix with a counter, so they are
    /// unique for the process lifetime and never collide with markup.
    fn generate_id(&mut self) -> String {
        self.token_id += 1;

        let mut hasher = DefaultHasher::new();
        self.prefix.hash(&mut hasher);
        self.token_id.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}

/// Parse one span into its processed text and placeholder tokens.
pub fn parse_span(
    environment: &mut Environment,
    references: &ReferenceRegistry,
    text: &str,
) -> (String, Vec<SpanToken>) {
    let mut parser = SpanParser::new();
    let value = parser.process(environment, references, text);
    (value, parser.into_tokens())
}
