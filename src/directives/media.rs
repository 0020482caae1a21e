//! Image and figure directives.

use std::collections::HashMap;

use crate::directives::{DirectiveContext, DirectiveHandler};
use crate::nodes::Node;

/// `.. image:: url` with layout options.
pub struct ImageDirective;

impl DirectiveHandler for ImageDirective {
    fn name(&self) -> &str {
        "image"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        _node: Option<Node>,
        data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        if data.is_empty() {
            context
                .environment
                .add_error("The image directive requires an image path");
            return None;
        }

        Some(context.factory.image(data.to_string(), options.clone()))
    }
}

/// `.. figure:: url` - an image with a parsed caption block.
pub struct FigureDirective;

impl DirectiveHandler for FigureDirective {
    fn name(&self) -> &str {
        "figure"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        if data.is_empty() {
            context
                .environment
                .add_error("The figure directive requires an image path");
            return None;
        }

        let image = context.factory.image(data.to_string(), options.clone());
        let caption = match node {
            Some(Node::Document { nodes }) => nodes,
            Some(other) => vec![other],
            None => Vec::new(),
        };

        Some(context.factory.figure(image, caption))
    }
}
