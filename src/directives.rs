//! Directive framework.
//!
//! A directive is an extension point written as `.. name:: data` followed by
//! indented options and content. Handlers implement [`DirectiveHandler`] and
//! are dispatched by name through a [`DirectiveRegistry`]; the document
//! parser hands each handler its (already parsed or raw) content block and
//! appends whatever node the handler returns. A `|variable|` prefix stores
//! the result in the environment instead.

use std::collections::HashMap;
use std::rc::Rc;

use crate::environment::Environment;
use crate::nodes::{Node, NodeFactory};
use crate::references::ReferenceRegistry;

pub mod admonitions;
pub mod code;
pub mod media;
pub mod metadata;
pub mod misc;

/// Everything a handler may need while processing.
pub struct DirectiveContext<'a> {
    pub environment: &'a mut Environment,
    pub references: &'a ReferenceRegistry,
    pub factory: &'a NodeFactory,
}

pub trait DirectiveHandler {
    fn name(&self) -> &str;

    /// Extra names this handler answers to.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// When true the content block is passed as a raw code node instead of
    /// being parsed as markup.
    fn wants_code(&self) -> bool {
        false
    }

    /// Turn the directive into a node, or `None` when it only has side
    /// effects.
    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        node: Option<Node>,
        data: &str,
        options: &HashMap<String, String>,
    ) -> Option<Node>;
}

pub struct DirectiveRegistry {
    handlers: HashMap<String, Rc<dyn DirectiveHandler>>,
}

impl DirectiveRegistry {
    /// Empty registry, without the built-in directives.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with all built-in directives.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Rc::new(code::CodeBlockDirective));
        registry.register(Rc::new(code::RawDirective));
        registry.register(Rc::new(media::ImageDirective));
        registry.register(Rc::new(media::FigureDirective));
        registry.register(Rc::new(metadata::MetaDirective));
        registry.register(Rc::new(metadata::ToctreeDirective));
        registry.register(Rc::new(misc::ReplaceDirective));
        registry.register(Rc::new(misc::QuoteDirective));
        registry.register(Rc::new(misc::DummyDirective));

        for name in [
            "note",
            "warning",
            "tip",
            "hint",
            "important",
            "caution",
            "attention",
            "danger",
            "error",
        ] {
            registry.register(Rc::new(admonitions::AdmonitionDirective::new(name)));
        }

        for (name, label) in [
            ("versionadded", "New in version"),
            ("versionchanged", "Changed in version"),
            ("deprecated", "Deprecated since version"),
        ] {
            registry.register(Rc::new(admonitions::VersionDirective::new(name, label)));
        }

        registry
    }

    pub fn register(&mut self, handler: Rc<dyn DirectiveHandler>) {
        for alias in handler.aliases() {
            self.handlers.insert((*alias).to_string(), handler.clone());
        }

        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn DirectiveHandler>> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DirectiveRegistry {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}
