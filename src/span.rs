//! Inline markup ("span") handling.
//!
//! A span is one logical line or paragraph of inline text. Parsing happens in
//! fixed stages over a string that progressively accumulates placeholder IDs:
//! literal spans first, then role references, then the token-level reference
//! pass, then standalone URLs and email addresses. The placeholders survive
//! every later stage untouched and are substituted back by the renderers.

pub mod lexer;
pub mod parser;
pub mod tokens;

pub use parser::SpanParser;
pub use tokens::{SpanToken, SpanTokenData};
