//! Renderer selection.

use once_cell::unsync::OnceCell;

use crate::nodes::Node;
use crate::render::{NodeRenderer, RenderContext};

/// Picks the renderer responsible for a node.
pub trait RendererFactory {
    fn renderer_for(&self, node: &Node) -> &dyn NodeRenderer;
}

/// Ordered renderer list with a structural fallback.
pub struct NodeRendererFactory {
    renderers: Vec<Box<dyn NodeRenderer>>,
    fallback: DefaultNodeRenderer,
}

impl NodeRendererFactory {
    pub fn new(renderers: Vec<Box<dyn NodeRenderer>>) -> Self {
        Self {
            renderers,
            fallback: DefaultNodeRenderer,
        }
    }
}

impl RendererFactory for NodeRendererFactory {
    fn renderer_for(&self, node: &Node) -> &dyn NodeRenderer {
        self.renderers
            .iter()
            .find(|renderer| renderer.supports(node))
            .map(Box::as_ref)
            .unwrap_or(&self.fallback)
    }
}

/// Defers building the renderer list until a node is first rendered.
pub struct LazyRendererFactory {
    constructor: Box<dyn Fn() -> NodeRendererFactory>,
    factory: OnceCell<NodeRendererFactory>,
}

impl LazyRendererFactory {
    pub fn new(constructor: impl Fn() -> NodeRendererFactory + 'static) -> Self {
        Self {
            constructor: Box::new(constructor),
            factory: OnceCell::new(),
        }
    }
}

impl RendererFactory for LazyRendererFactory {
    fn renderer_for(&self, node: &Node) -> &dyn NodeRenderer {
        self.factory
            .get_or_init(|| (self.constructor)())
            .renderer_for(node)
    }
}

/// Fallback: walk containers, emit raw nodes and callables, ignore the rest.
pub struct DefaultNodeRenderer;

impl NodeRenderer for DefaultNodeRenderer {
    fn supports(&self, _node: &Node) -> bool {
        true
    }

    fn render(&self, node: &Node, context: &RenderContext<'_>) -> String {
        match node {
            Node::Raw { value } => value.clone(),
            Node::Callable(callable) => callable.call(),
            Node::Wrapper {
                nodes,
                before,
                after,
            } => format!("{}{}{}", before, context.render_all(nodes), after),
            other => context.render_all(other.children()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::environment::{Environment, ErrorManager};
    use crate::nodes::{CallableNode, SpanNode};
    use crate::references::ReferenceRegistry;

    #[test]
    fn test_fallback_walks_containers_and_emits_raw() {
        let errors = Rc::new(ErrorManager::new());
        let env = Environment::new(errors.clone());
        let refs = ReferenceRegistry::new(errors);
        let factory = NodeRendererFactory::new(Vec::new());
        let context = RenderContext::new(&env, &refs, &factory);

        let tree = Node::Document {
            nodes: vec![
                Node::Raw { value: "x".into() },
                Node::Paragraph {
                    span: SpanNode::plain("ignored"),
                },
                Node::Raw { value: "y".into() },
            ],
        };

        assert_eq!(context.render(&tree), "xy");
    }

    #[test]
    fn test_fallback_invokes_callable_thunks() {
        let errors = Rc::new(ErrorManager::new());
        let env = Environment::new(errors.clone());
        let refs = ReferenceRegistry::new(errors);
        let factory = NodeRendererFactory::new(Vec::new());
        let context = RenderContext::new(&env, &refs, &factory);

        let tree = Node::Document {
            nodes: vec![Node::Callable(CallableNode::new(|| "deferred".to_string()))],
        };

        assert_eq!(context.render(&tree), "deferred");
    }

    #[test]
    fn test_lazy_factory_builds_on_first_render_only() {
        let errors = Rc::new(ErrorManager::new());
        let env = Environment::new(errors.clone());
        let refs = ReferenceRegistry::new(errors);

        let built = Rc::new(Cell::new(0));
        let count = built.clone();
        let lazy = LazyRendererFactory::new(move || {
            count.set(count.get() + 1);
            NodeRendererFactory::new(Vec::new())
        });
        assert_eq!(built.get(), 0);

        let context = RenderContext::new(&env, &refs, &lazy);
        assert_eq!(built.get(), 0);

        context.render(&Node::Raw { value: "a".into() });
        context.render(&Node::Raw { value: "b".into() });
        assert_eq!(built.get(), 1);
    }
}
