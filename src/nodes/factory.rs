//! Node construction with post-create hooks.
//!
//! Every node the block parser or a directive produces goes through the
//! [`NodeFactory`], which runs registered hooks on each created node. Hooks
//! observe the stream as it is built; collecting titles for a table of
//! contents is the typical use.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::environment::Environment;
use crate::nodes::{
    CallableNode, DefinitionListNode, ListNode, Node, SectionInfo, SpanNode, TableNode, TitleNode,
};

pub type NodeHook = Box<dyn Fn(&Node)>;

#[derive(Default)]
pub struct NodeFactory {
    hooks: RefCell<Vec<NodeHook>>,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook fired for every created node, in registration order.
    pub fn add_hook(&self, hook: impl Fn(&Node) + 'static) {
        self.hooks.borrow_mut().push(Box::new(hook));
    }

    /// Run the hooks over a finished node and hand it back.
    pub fn create(&self, node: Node) -> Node {
        for hook in self.hooks.borrow().iter() {
            hook(&node);
        }

        node
    }

    pub fn document(&self, nodes: Vec<Node>) -> Node {
        self.create(Node::Document { nodes })
    }

    /// Title node; the anchor slug comes from the raw text.
    pub fn title(&self, text: &str, span: SpanNode, level: usize) -> Node {
        self.create(Node::Title(TitleNode {
            id: Environment::slugify(text),
            text: text.to_string(),
            span,
            level,
        }))
    }

    pub fn section_begin(&self, info: SectionInfo) -> Node {
        self.create(Node::SectionBegin(info))
    }

    pub fn section_end(&self, info: SectionInfo) -> Node {
        self.create(Node::SectionEnd(info))
    }

    pub fn paragraph(&self, span: SpanNode) -> Node {
        self.create(Node::Paragraph { span })
    }

    pub fn span(&self, span: SpanNode) -> Node {
        self.create(Node::Span { span })
    }

    pub fn separator(&self, level: usize) -> Node {
        self.create(Node::Separator { level })
    }

    pub fn list(&self, list: ListNode) -> Node {
        self.create(Node::List(list))
    }

    pub fn definition_list(&self, list: DefinitionListNode) -> Node {
        self.create(Node::DefinitionList(list))
    }

    pub fn table(&self, table: TableNode) -> Node {
        self.create(Node::Table(table))
    }

    pub fn code(&self, value: String, language: Option<String>, starting_line: Option<usize>) -> Node {
        self.create(Node::Code {
            value,
            language,
            starting_line,
        })
    }

    pub fn quote(&self, nodes: Vec<Node>) -> Node {
        self.create(Node::Quote { nodes })
    }

    pub fn image(&self, url: String, options: HashMap<String, String>) -> Node {
        self.create(Node::Image { url, options })
    }

    pub fn figure(&self, image: Node, document: Vec<Node>) -> Node {
        self.create(Node::Figure {
            image: Box::new(image),
            document,
        })
    }

    pub fn meta(&self, key: String, value: String) -> Node {
        self.create(Node::Meta { key, value })
    }

    pub fn toc(&self, files: Vec<String>, options: HashMap<String, String>) -> Node {
        self.create(Node::Toc { files, options })
    }

    pub fn anchor(&self, name: String) -> Node {
        self.create(Node::Anchor { name })
    }

    pub fn admonition(&self, name: String, nodes: Vec<Node>) -> Node {
        self.create(Node::Admonition { name, nodes })
    }

    pub fn raw(&self, value: String) -> Node {
        self.create(Node::Raw { value })
    }

    pub fn callable(&self, thunk: impl Fn() -> String + 'static) -> Node {
        self.create(Node::Callable(CallableNode::new(thunk)))
    }

    pub fn wrapper(&self, nodes: Vec<Node>, before: String, after: String) -> Node {
        self.create(Node::Wrapper {
            nodes,
            before,
            after,
        })
    }

    pub fn dummy(&self, data: serde_json::Value) -> Node {
        self.create(Node::Dummy { data })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_hooks_observe_created_nodes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let factory = NodeFactory::new();
        let sink = seen.clone();
        factory.add_hook(move |node| sink.borrow_mut().push(node.kind()));

        factory.paragraph(SpanNode::plain("a"));
        factory.separator(1);

        assert_eq!(*seen.borrow(), vec!["paragraph", "separator"]);
    }

    #[test]
    fn test_title_slug() {
        let factory = NodeFactory::new();
        let node = factory.title("Hello, World!", SpanNode::plain("Hello, World!"), 1);
        match node {
            Node::Title(title) => {
                assert_eq!(title.id, "hello-world");
                assert_eq!(title.level, 1);
            }
            other => panic!("expected title, got {:?}", other),
        }
    }
}
