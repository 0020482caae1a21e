//! Inline span lexer.
//!
//! Tokenizes one line or paragraph of inline markup into reference-syntax
//! tokens using a logos lexer, then exposes the result as an immutable token
//! array with a cursor on top. Backtracking is a first-class operation: a
//! failed reference parse takes a [`Checkpoint`] before consuming tokens and
//! restores it afterwards, which reproduces the exact pre-attempt state
//! because the token array itself never changes.

use logos::Logos;

/// Token kinds for inline reference syntax.
///
/// Ordered by specificity: logos always prefers the longest match, so
/// `` `__ `` wins over `` `_ `` which wins over a bare backtick, and
/// `word__` wins over `word_` which wins over `word`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TokenKind {
    /// `word__` - anonymous reference.
    #[regex(r"[a-zA-Z0-9-]+__")]
    AnonymousReference,

    /// `word_` - named reference. Only valid before whitespace, `.`, `+` or
    /// end of input; the lexer downgrades other occurrences to plain text in
    /// a post pass (see [`tokenize`]).
    #[regex(r"[a-zA-Z0-9-]+_")]
    NamedReference,

    /// `` `__ `` - phrase anonymous reference end.
    #[token("`__")]
    PhraseAnonymousEnd,

    /// `` `_ `` - named reference end.
    #[token("`_")]
    NamedReferenceEnd,

    /// `` _` `` - internal reference target start.
    #[token("_`")]
    InternalReferenceStart,

    #[token("`")]
    Backtick,

    /// `<` - embedded URL start inside a phrase reference.
    #[token("<")]
    EmbeddedUrlStart,

    /// `>` - embedded URL end.
    #[token(">")]
    EmbeddedUrlEnd,

    /// `\_` - escaped underscore, defeats reference detection.
    #[token("\\_")]
    EscapedUnderscore,

    #[token("__")]
    AnonymousEnd,

    #[token("_")]
    Underscore,

    #[regex(r"[a-zA-Z0-9-]+")]
    Word,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("\\")]
    Backslash,

    /// Any other run of characters.
    #[regex(r"[^a-zA-Z0-9`<>_\\ \t\r\n-]+")]
    Text,
}

/// One inline token with its byte offset into the lexed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: usize,
}

/// Integer checkpoint into a [`SpanLexer`] token array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Tokenize inline text into the full token array.
///
/// A post pass downgrades `word_` named-reference tokens that are not
/// followed by whitespace, `.`, `+` or end of input: the underscore then has
/// no reference meaning and the token becomes plain text, so `snake_case`
/// survives untouched.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Text);
        tokens.push(Token {
            kind,
            value: lexer.slice().to_string(),
            position: lexer.span().start,
        });
    }

    for index in 0..tokens.len() {
        if tokens[index].kind != TokenKind::NamedReference {
            continue;
        }

        let boundary = match tokens.get(index + 1) {
            None => true,
            Some(next) => match next.value.chars().next() {
                Some(ch) => ch.is_whitespace() || ch == '.' || ch == '+',
                None => true,
            },
        };

        if !boundary {
            tokens[index].kind = TokenKind::Text;
        }
    }

    tokens
}

/// Cursor over the immutable inline token array.
#[derive(Debug, Clone)]
pub struct SpanLexer {
    tokens: Vec<Token>,
    cursor: usize,
}

impl SpanLexer {
    pub fn new(input: &str) -> Self {
        Self {
            tokens: tokenize(input),
            cursor: 0,
        }
    }

    /// Replace the input, rewinding the cursor to the start.
    pub fn set_input(&mut self, input: &str) {
        self.tokens = tokenize(input);
        self.cursor = 0;
    }

    /// The token under the cursor, or `None` at end of input.
    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Advance past the current token. Returns false once the end is reached.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }

        self.cursor < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor + 1)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.0 <= self.tokens.len());
        self.cursor = checkpoint.0;
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }
}
