//! Directives consuming their content verbatim.

use std::collections::HashMap;

use crate::directives::{DirectiveContext, DirectiveHandler};
use crate::nodes::Node;

/// `.. code-block:: language` - a highlighted code block.
pub struct CodeBlockDirective;

impl DirectiveHandler for CodeBlockDirective {
    fn name(&self) -> &str {
        "code-block"
    }

    fn aliases(&self) -> &[&str] {
        &["code"]
    }

    fn wants_code(&self) -> bool {
        true
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node> {
        let value = match node {
            Some(Node::Code { value, .. }) => value,
            _ => return None,
        };

        let language = if data.is_empty() {
            None
        } else {
            Some(data.to_string())
        };

        // `:number-lines:` alone starts at 1; a value sets the first number.
        let starting_line = options
            .get("number-lines")
            .map(|start| start.trim().parse().unwrap_or(1));

        Some(context.factory.code(value, language, starting_line))
    }
}

/// `.. raw:: format` - content passed through to the output untouched.
pub struct RawDirective;

impl DirectiveHandler for RawDirective {
    fn name(&self) -> &str {
        "raw"
    }

    fn wants_code(&self) -> bool {
        true
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        _data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        match node {
            Some(Node::Code { value, .. }) => Some(context.factory.raw(value)),
            _ => None,
        }
    }
}
