//! Document metadata directives.

use std::collections::HashMap;

use crate::directives::{DirectiveContext, DirectiveHandler};
use crate::nodes::Node;

/// `.. meta::` - each option becomes one meta entry.
pub struct MetaDirective;

impl DirectiveHandler for MetaDirective {
    fn name(&self) -> &str {
        "meta"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        _node: Option<Node>,
        _data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        let mut keys: Vec<&String> = options.keys().collect();
        keys.sort();

        let nodes = keys
            .into_iter()
            .map(|key| {
                context
                    .factory
                    .meta(key.clone(), options[key].clone())
            })
            .collect();

        Some(context.factory.document(nodes))
    }
}

/// `.. toctree::` - the content lines name the documents of the tree.
pub struct ToctreeDirective;

impl DirectiveHandler for ToctreeDirective {
    fn name(&self) -> &str {
        "toctree"
    }

    fn wants_code(&self) -> bool {
        true
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        _data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        let files: Vec<String> = match &node {
            Some(Node::Code { value, .. }) => value
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        for file in &files {
            context.environment.add_dependency(file);
        }

        Some(context.factory.toc(files, options.clone()))
    }
}
