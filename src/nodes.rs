//! Document tree node types.
//!
//! The block parser produces a flat-ish tree of [`Node`]s: a document node
//! holding block nodes, some of which hold sub-documents (quotes, list items,
//! figure captions). Inline content always appears as a [`SpanNode`], the
//! processed span text plus its placeholder tokens.
//!
//! Section structure is explicit in the stream: every title is preceded by a
//! `SectionBegin` and matching `SectionEnd` events are emitted when the
//! section closes, so renderers never have to re-derive nesting from levels.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::span::tokens::SpanToken;

pub mod factory;
pub mod table;

pub use factory::NodeFactory;
pub use table::{TableKind, TableNode, TableRow};

/// Processed inline text plus the placeholder tokens embedded in it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SpanNode {
    pub value: String,
    pub tokens: Vec<SpanToken>,
}

impl SpanNode {
    pub fn new(value: impl Into<String>, tokens: Vec<SpanToken>) -> Self {
        Self {
            value: value.into(),
            tokens,
        }
    }

    /// A span with no placeholders, used for raw fragments.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(value, Vec::new())
    }
}

/// A title together with its slug and resolved level.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TitleNode {
    /// Raw title text before span processing.
    pub text: String,
    pub span: SpanNode,
    pub level: usize,
    /// Anchor slug derived from the raw text.
    pub id: String,
}

/// Identity of a section, carried by the begin/end events.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SectionInfo {
    pub id: String,
    pub level: usize,
    pub text: String,
}

/// One bullet or enumerated list item, holding a sub-document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListItem {
    /// The marker as written, e.g. `-` or `1.`.
    pub prefix: String,
    pub ordered: bool,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ListNode {
    pub items: Vec<ListItem>,
}

impl ListNode {
    /// A list is ordered when its first item is.
    pub fn ordered(&self) -> bool {
        self.items.first().map(|item| item.ordered).unwrap_or(false)
    }
}

/// One term of a definition list.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DefinitionTerm {
    pub term: SpanNode,
    /// Classifiers following the term after ` : ` separators.
    pub classifiers: Vec<SpanNode>,
    pub definition: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DefinitionListNode {
    pub terms: Vec<DefinitionTerm>,
}

/// A deferred piece of output, produced only when a renderer asks for it.
#[derive(Clone)]
pub struct CallableNode {
    thunk: Rc<dyn Fn() -> String>,
}

impl CallableNode {
    pub fn new(thunk: impl Fn() -> String + 'static) -> Self {
        Self {
            thunk: Rc::new(thunk),
        }
    }

    pub fn call(&self) -> String {
        (self.thunk)()
    }
}

impl fmt::Debug for CallableNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallableNode(..)")
    }
}

impl PartialEq for CallableNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.thunk, &other.thunk)
    }
}

impl serde::Serialize for CallableNode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

/// Block node of the document tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Node {
    Document { nodes: Vec<Node> },
    SectionBegin(SectionInfo),
    SectionEnd(SectionInfo),
    Title(TitleNode),
    Paragraph { span: SpanNode },
    /// Bare inline content, e.g. a collapsed single-paragraph list item.
    Span { span: SpanNode },
    Separator { level: usize },
    List(ListNode),
    DefinitionList(DefinitionListNode),
    Table(TableNode),
    Code {
        value: String,
        language: Option<String>,
        /// First displayed line number when numbering is requested.
        starting_line: Option<usize>,
    },
    Quote { nodes: Vec<Node> },
    Image {
        url: String,
        options: HashMap<String, String>,
    },
    Figure {
        image: Box<Node>,
        document: Vec<Node>,
    },
    Meta { key: String, value: String },
    Toc {
        files: Vec<String>,
        options: HashMap<String, String>,
    },
    Anchor { name: String },
    /// An admonition (note, warning, ...) or version note around a
    /// sub-document.
    Admonition { name: String, nodes: Vec<Node> },
    /// Pre-rendered output emitted verbatim.
    Raw { value: String },
    /// Output computed at render time by a stored thunk.
    Callable(CallableNode),
    /// A sub-document wrapped in fixed before/after output.
    Wrapper {
        nodes: Vec<Node>,
        before: String,
        after: String,
    },
    /// Test scaffolding node carrying arbitrary data.
    Dummy { data: serde_json::Value },
}

impl Node {
    /// Short kind name, used in diagnostics and snapshots.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Document { .. } => "document",
            Node::SectionBegin(_) => "section-begin",
            Node::SectionEnd(_) => "section-end",
            Node::Title(_) => "title",
            Node::Paragraph { .. } => "paragraph",
            Node::Span { .. } => "span",
            Node::Separator { .. } => "separator",
            Node::List(_) => "list",
            Node::DefinitionList(_) => "definition-list",
            Node::Table(_) => "table",
            Node::Code { .. } => "code",
            Node::Quote { .. } => "quote",
            Node::Image { .. } => "image",
            Node::Figure { .. } => "figure",
            Node::Meta { .. } => "meta",
            Node::Toc { .. } => "toc",
            Node::Anchor { .. } => "anchor",
            Node::Admonition { .. } => "admonition",
            Node::Raw { .. } => "raw",
            Node::Callable(_) => "callable",
            Node::Wrapper { .. } => "wrapper",
            Node::Dummy { .. } => "dummy",
        }
    }

    /// Child nodes of container variants.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { nodes } => nodes,
            Node::Quote { nodes } => nodes,
            Node::Admonition { nodes, .. } => nodes,
            Node::Wrapper { nodes, .. } => nodes,
            _ => &[],
        }
    }

    /// JSON snapshot of the tree, used by the inspect command and tests.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
