//! Admonitions and version notes.

use std::collections::HashMap;

use crate::directives::{DirectiveContext, DirectiveHandler};
use crate::nodes::{Node, SpanNode};
use crate::span::parser::parse_span;

/// `.. note::`, `.. warning::` and friends: a classed box around the parsed
/// content.
pub struct AdmonitionDirective {
    name: &'static str,
}

impl AdmonitionDirective {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl DirectiveHandler for AdmonitionDirective {
    fn name(&self) -> &str {
        self.name
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        let mut nodes = Vec::new();

        // Data on the directive line is the first paragraph.
        if !data.is_empty() {
            let (value, tokens) = parse_span(context.environment, context.references, data);
            nodes.push(context.factory.paragraph(SpanNode::new(value, tokens)));
        }

        match node {
            Some(Node::Document { nodes: inner }) => nodes.extend(inner),
            Some(other) => nodes.push(other),
            None => {}
        }

        Some(context.factory.admonition(self.name.to_string(), nodes))
    }
}

/// `.. versionadded::` and friends: a labelled note about an API version.
pub struct VersionDirective {
    name: &'static str,
    label: &'static str,
}

impl VersionDirective {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

impl DirectiveHandler for VersionDirective {
    fn name(&self) -> &str {
        self.name
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        if data.is_empty() {
            context.environment.add_error(format!(
                "The {} directive requires a version number",
                self.name
            ));
            return None;
        }

        let (value, tokens) = parse_span(
            context.environment,
            context.references,
            &format!("{} {}", self.label, data),
        );

        let mut nodes = vec![context.factory.paragraph(SpanNode::new(value, tokens))];

        match node {
            Some(Node::Document { nodes: inner }) => nodes.extend(inner),
            Some(other) => nodes.push(other),
            None => {}
        }

        Some(context.factory.admonition(self.name.to_string(), nodes))
    }
}
