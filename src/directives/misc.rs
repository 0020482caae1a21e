//! Substitution, quote and test-support directives.

use std::collections::HashMap;

use crate::directives::{DirectiveContext, DirectiveHandler};
use crate::nodes::{Node, SpanNode};
use crate::span::parser::parse_span;

/// `.. |name| replace:: text` - the parsed text becomes the variable value.
pub struct ReplaceDirective;

impl DirectiveHandler for ReplaceDirective {
    fn name(&self) -> &str {
        "replace"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        _node: Option<Node>,
        data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        let (value, tokens) = parse_span(context.environment, context.references, data);
        Some(context.factory.span(SpanNode::new(value, tokens)))
    }
}

/// `.. quote::` / `.. epigraph::` - a block quote with parsed content.
pub struct QuoteDirective;

impl DirectiveHandler for QuoteDirective {
    fn name(&self) -> &str {
        "quote"
    }

    fn aliases(&self) -> &[&str] {
        &["epigraph"]
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        _data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        let nodes = match node {
            Some(Node::Document { nodes }) => nodes,
            Some(other) => vec![other],
            None => Vec::new(),
        };

        Some(context.factory.quote(nodes))
    }
}

/// `.. dummy::` - records its inputs, for exercising the directive
/// machinery.
pub struct DummyDirective;

impl DirectiveHandler for DummyDirective {
    fn name(&self) -> &str {
        "dummy"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        let mut sorted: Vec<(&String, &String)> = options.iter().collect();
        sorted.sort();

        Some(context.factory.dummy(serde_json::json!({
            "data": data,
            "options": sorted,
            "content": node.map(|n| n.to_json()),
        })))
    }
}
