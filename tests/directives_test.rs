//! Directive dispatch and the built-in directive set.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rst::directives::{DirectiveContext, DirectiveHandler};
use rst::nodes::Node;
use rst::{OutputFormat, Parser};

fn parse(input: &str) -> (Vec<Node>, Parser) {
    let mut parser = Parser::new();
    let document = parser.parse(input);
    match document {
        Node::Document { nodes } => (nodes, parser),
        other => panic!("expected document, got {:?}", other),
    }
}

#[test]
fn test_code_block_directive_sets_language() {
    let input = "\
.. code-block:: php

    <?php
    echo 1;
";
    let (nodes, parser) = parse(input);
    assert!(parser.errors().is_empty());

    match &nodes[..] {
        [Node::Code {
            value,
            language,
            starting_line,
        }] => {
            assert_eq!(value, "<?php\necho 1;");
            assert_eq!(language.as_deref(), Some("php"));
            assert_eq!(*starting_line, None);
        }
        other => panic!("expected code node, got {:?}", other),
    }
}

#[test]
fn test_code_alias_and_number_lines_option() {
    let input = "\
.. code:: rust
    :number-lines:

    let x = 1;
";
    let (nodes, _) = parse(input);
    match &nodes[..] {
        [Node::Code {
            language,
            starting_line,
            ..
        }] => {
            assert_eq!(language.as_deref(), Some("rust"));
            assert_eq!(*starting_line, Some(1));
        }
        other => panic!("expected code node, got {:?}", other),
    }
}

#[test]
fn test_number_lines_start_value_reaches_the_output() {
    let input = "\
.. code-block:: rust
    :number-lines: 10

    let x = 1;
";
    let (nodes, parser) = parse(input);
    match &nodes[..] {
        [Node::Code { starting_line, .. }] => assert_eq!(*starting_line, Some(10)),
        other => panic!("expected code node, got {:?}", other),
    }

    let html = parser.render(
        &Node::Document {
            nodes: nodes.clone(),
        },
        OutputFormat::Html,
    );
    assert!(html.contains("data-number-lines=\"10\""), "{}", html);
}

#[test]
fn test_unknown_directive_reports_error_and_keeps_block() {
    let input = "\
.. bogus:: something

    kept content

after
";
    let (nodes, parser) = parse(input);
    let kinds: Vec<&str> = nodes.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec!["quote", "paragraph"]);

    match &nodes[0] {
        Node::Quote { nodes } => match &nodes[..] {
            [Node::Paragraph { span }] => assert_eq!(span.value, "kept content"),
            other => panic!("expected paragraph, got {:?}", other),
        },
        other => panic!("expected quote, got {:?}", other),
    }

    let errors = parser.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Unknown directive \"bogus\""), "{}", errors[0]);
}

#[test]
fn test_unknown_directive_at_end_of_input_still_reports() {
    let (nodes, parser) = parse(".. bogus:: something\n");
    assert!(nodes.is_empty());

    let errors = parser.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Unknown directive \"bogus\""), "{}", errors[0]);
}

#[test]
fn test_hooks_observe_directive_content_nodes() {
    let mut parser = Parser::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    parser.factory().add_hook(move |node| sink.borrow_mut().push(node.kind()));

    parser.parse(".. code-block:: php\n\n    echo 1;\n");

    // The raw content node and the one the handler produces both go
    // through the factory.
    let codes = seen.borrow().iter().filter(|kind| **kind == "code").count();
    assert_eq!(codes, 2);
    assert!(seen.borrow().contains(&"document"));
}

#[test]
fn test_admonition_with_data_and_content() {
    let input = "\
.. note:: Heads up.

    More detail here.
";
    let (nodes, parser) = parse(input);
    match &nodes[..] {
        [Node::Admonition { name, nodes }] => {
            assert_eq!(name, "note");
            let kinds: Vec<&str> = nodes.iter().map(Node::kind).collect();
            assert_eq!(kinds, vec!["paragraph", "paragraph"]);
        }
        other => panic!("expected admonition, got {:?}", other),
    }

    let html = parser.render(
        &Node::Document {
            nodes: nodes.clone(),
        },
        OutputFormat::Html,
    );
    assert!(html.contains("class=\"admonition note\""), "{}", html);
    assert!(html.contains("Heads up."), "{}", html);
}

#[test]
fn test_version_directive_renders_label() {
    let (nodes, _) = parse(".. versionadded:: 2.1\n");
    match &nodes[..] {
        [Node::Admonition { name, nodes }] => {
            assert_eq!(name, "versionadded");
            match &nodes[..] {
                [Node::Paragraph { span }] => {
                    assert_eq!(span.value, "New in version 2.1");
                }
                other => panic!("expected paragraph, got {:?}", other),
            }
        }
        other => panic!("expected admonition, got {:?}", other),
    }
}

#[test]
fn test_replace_directive_defines_a_variable() {
    let input = "\
.. |product| replace:: **Our Product**

Try |product| today.
";
    let (nodes, parser) = parse(input);
    let kinds: Vec<&str> = nodes.iter().map(Node::kind).collect();
    assert_eq!(kinds, vec!["paragraph"]);

    let html = parser.render(
        &Node::Document {
            nodes: nodes.clone(),
        },
        OutputFormat::Html,
    );
    assert_eq!(html, "<p>Try <strong>Our Product</strong> today.</p>\n");
}

#[test]
fn test_toctree_collects_files_and_dependencies() {
    let input = "\
.. toctree::
    :maxdepth: 2

    intro
    usage
";
    let (nodes, parser) = parse(input);
    match &nodes[..] {
        [Node::Toc { files, options }] => {
            assert_eq!(files, &["intro".to_string(), "usage".to_string()]);
            assert_eq!(options.get("maxdepth").map(String::as_str), Some("2"));
        }
        other => panic!("expected toc, got {:?}", other),
    }
    assert_eq!(
        parser.environment().dependencies(),
        ["intro".to_string(), "usage".to_string()]
    );
}

#[test]
fn test_image_and_figure() {
    let input = "\
.. image:: pictures/cat.png
    :alt: A cat

.. figure:: pictures/dog.png

    The caption.
";
    let (nodes, _) = parse(input);
    match &nodes[..] {
        [Node::Image { url, options }, Node::Figure { image, document }] => {
            assert_eq!(url, "pictures/cat.png");
            assert_eq!(options.get("alt").map(String::as_str), Some("A cat"));
            match image.as_ref() {
                Node::Image { url, .. } => assert_eq!(url, "pictures/dog.png"),
                other => panic!("expected image, got {:?}", other),
            }
            assert_eq!(document.len(), 1);
        }
        other => panic!("expected image and figure, got {:?}", other),
    }
}

#[test]
fn test_raw_directive_passes_through() {
    let input = "\
.. raw:: html

    <hr class=\"custom\" />
";
    let (nodes, parser) = parse(input);
    let html = parser.render(
        &Node::Document {
            nodes: nodes.clone(),
        },
        OutputFormat::Html,
    );
    assert_eq!(html, "<hr class=\"custom\" />");
}

#[test]
fn test_quote_directive() {
    let input = "\
.. epigraph::

    To be or not to be.
";
    let (nodes, _) = parse(input);
    match &nodes[..] {
        [Node::Quote { nodes }] => {
            let kinds: Vec<&str> = nodes.iter().map(Node::kind).collect();
            assert_eq!(kinds, vec!["paragraph"]);
        }
        other => panic!("expected quote, got {:?}", other),
    }
}

#[test]
fn test_meta_directive() {
    let input = "\
.. meta::
    :description: A page.
    :keywords: a, b
";
    let (nodes, parser) = parse(input);
    let html = parser.render(
        &Node::Document {
            nodes: nodes.clone(),
        },
        OutputFormat::Html,
    );
    assert!(html.contains("<meta name=\"description\" content=\"A page.\" />"));
    assert!(html.contains("<meta name=\"keywords\" content=\"a, b\" />"));
}

struct UppercaseDirective;

impl DirectiveHandler for UppercaseDirective {
    fn name(&self) -> &str {
        "uppercase"
    }

    fn process(
        &self,
        context: &mut DirectiveContext<'_>,
        _node: Option<Node>,
        data: &str,
        _options: &HashMap<String, String>,
    ) -> Option<Node> {
        Some(context.factory.raw(data.to_uppercase()))
    }
}

#[test]
fn test_custom_directive_registration() {
    let mut parser = Parser::new();
    parser.register_directive(Rc::new(UppercaseDirective));

    let document = parser.parse(".. uppercase:: shout\n");
    let html = parser.render(&document, OutputFormat::Html);
    assert_eq!(html, "SHOUT");
    assert!(parser.errors().is_empty());
}
