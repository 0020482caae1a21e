//! # rst
//!
//! A compiler for a reStructuredText-style markup format.
//!
//! Parsing happens in two layers: the block parser recognizes the
//! line-oriented structure (titles, lists, tables, directives, literal
//! blocks) and the span parser resolves inline markup into placeholder
//! tokens. The result is a [`nodes::Node`] tree that per-format renderer
//! factories turn into HTML or LaTeX.
//!
//! [`Parser`] is the façade wiring the pieces together:
//!
//! ```no_run
//! use rst::{OutputFormat, Parser};
//!
//! let mut parser = Parser::new();
//! let document = parser.parse("Title\n=====\n\nSome *text*.\n");
//! let html = parser.render(&document, OutputFormat::Html);
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::rc::Rc;

pub mod directives;
pub mod environment;
pub mod nodes;
pub mod parser;
pub mod references;
pub mod render;
pub mod span;

use directives::{DirectiveHandler, DirectiveRegistry};
use environment::{Environment, ErrorManager, Severity};
use nodes::{Node, NodeFactory};
use parser::DocumentParser;
use references::{ReferenceRegistry, ReferenceResolver};
use render::{html_renderer_factory, latex_renderer_factory, LazyRendererFactory, RenderContext};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Latex,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" => Some(OutputFormat::Html),
            "latex" | "tex" => Some(OutputFormat::Latex),
            _ => None,
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Level the first heading letter maps to.
    pub initial_header_level: usize,
    /// File name used in diagnostics.
    pub file_name: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            initial_header_level: 1,
            file_name: None,
        }
    }
}

/// The compiler façade: owns the environment, reference registry, directive
/// registry and node factory, and runs parses and renders against them.
pub struct Parser {
    environment: Environment,
    references: ReferenceRegistry,
    directives: DirectiveRegistry,
    factory: Rc<NodeFactory>,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_configuration(Configuration::default())
    }

    pub fn with_configuration(configuration: Configuration) -> Self {
        let errors = Rc::new(ErrorManager::new());
        let mut environment = Environment::new(errors.clone());
        environment.set_initial_header_level(configuration.initial_header_level);
        if let Some(file_name) = configuration.file_name {
            environment.set_current_file_name(file_name);
        }

        Self {
            environment,
            references: ReferenceRegistry::new(errors),
            directives: DirectiveRegistry::new(),
            factory: Rc::new(NodeFactory::new()),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn references(&self) -> &ReferenceRegistry {
        &self.references
    }

    /// Seed reference targets or install extra resolvers before parsing.
    pub fn references_mut(&mut self) -> &mut ReferenceRegistry {
        &mut self.references
    }

    pub fn register_directive(&mut self, handler: Rc<dyn DirectiveHandler>) {
        self.directives.register(handler);
    }

    pub fn register_reference(&mut self, resolver: Box<dyn ReferenceResolver>) {
        self.references.register(resolver);
    }

    pub fn factory(&self) -> &Rc<NodeFactory> {
        &self.factory
    }

    /// Parse a document. Heading-level state is reset; links and variables
    /// accumulate across calls on purpose.
    pub fn parse(&mut self, text: &str) -> Node {
        self.environment.reset();
        self.parse_fragment(text)
    }

    /// Parse without resetting heading state.
    pub fn parse_fragment(&mut self, text: &str) -> Node {
        let directives = Rc::new(self.directives.clone());
        let mut parser = DocumentParser::new(
            &mut self.environment,
            &self.references,
            directives,
            self.factory.clone(),
        );
        parser.parse(text)
    }

    pub fn parse_file(&mut self, path: &Path) -> io::Result<Node> {
        let text = fs::read_to_string(path)?;
        self.environment
            .set_current_file_name(path.display().to_string());
        Ok(self.parse(&text))
    }

    pub fn render(&self, document: &Node, format: OutputFormat) -> String {
        let factory = match format {
            OutputFormat::Html => LazyRendererFactory::new(html_renderer_factory),
            OutputFormat::Latex => LazyRendererFactory::new(latex_renderer_factory),
        };
        RenderContext::new(&self.environment, &self.references, &factory).render(document)
    }

    pub fn errors(&self) -> Vec<String> {
        self.environment.error_manager().errors()
    }

    pub fn diagnostics(&self) -> Vec<(Severity, String)> {
        self.environment.error_manager().messages()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render_roundtrip() {
        let mut parser = Parser::new();
        let document = parser.parse("Hello **world**.\n");
        let html = parser.render(&document, OutputFormat::Html);
        assert_eq!(html, "<p>Hello <strong>world</strong>.</p>\n");
        assert!(parser.errors().is_empty());
    }

    #[test]
    fn test_initial_header_level_offsets_titles() {
        let mut parser = Parser::with_configuration(Configuration {
            initial_header_level: 2,
            file_name: None,
        });
        let document = parser.parse("Title\n=====\n");
        let html = parser.render(&document, OutputFormat::Html);
        assert!(html.contains("<h2 id=\"title\">Title</h2>"), "{}", html);
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("html"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::from_name("tex"), Some(OutputFormat::Latex));
        assert_eq!(OutputFormat::from_name("pdf"), None);
    }
}
