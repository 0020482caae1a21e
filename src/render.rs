//! Output rendering.
//!
//! Rendering is a per-format concern behind two seams: [`NodeRenderer`]
//! turns one node into output text, [`factory::RendererFactory`] picks the
//! renderer for a node. The HTML and LaTeX factories each install one
//! renderer covering the whole node enum plus a default renderer that walks
//! containers.

pub mod factory;
pub mod html;
pub mod latex;
pub mod template;

use crate::environment::Environment;
use crate::nodes::Node;
use crate::references::ReferenceRegistry;

pub use factory::{LazyRendererFactory, NodeRendererFactory, RendererFactory};
pub use html::html_renderer_factory;
pub use latex::latex_renderer_factory;

/// Renders one node kind (or several) into output text.
pub trait NodeRenderer {
    fn supports(&self, node: &Node) -> bool;
    fn render(&self, node: &Node, context: &RenderContext<'_>) -> String;
}

/// Everything renderers need: read access to the parse results and the
/// factory for recursion.
pub struct RenderContext<'a> {
    pub environment: &'a Environment,
    pub references: &'a ReferenceRegistry,
    pub factory: &'a dyn RendererFactory,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        environment: &'a Environment,
        references: &'a ReferenceRegistry,
        factory: &'a dyn RendererFactory,
    ) -> Self {
        Self {
            environment,
            references,
            factory,
        }
    }

    pub fn render(&self, node: &Node) -> String {
        self.factory.renderer_for(node).render(node, self)
    }

    pub fn render_all(&self, nodes: &[Node]) -> String {
        nodes.iter().map(|node| self.render(node)).collect()
    }
}
