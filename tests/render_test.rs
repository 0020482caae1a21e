//! End-to-end rendering of whole documents.

use rstest::rstest;

use rst::{OutputFormat, Parser};

fn render(input: &str, format: OutputFormat) -> String {
    let mut parser = Parser::new();
    let document = parser.parse(input);
    parser.render(&document, format)
}

#[test]
fn test_html_document_snapshot() {
    let input = "\
Title
=====

Hello **world**.

- one
- two
";
    insta::assert_snapshot!(render(input, OutputFormat::Html), @r###"
    <section id="title">
    <h1 id="title">Title</h1>
    <p>Hello <strong>world</strong>.</p>
    <ul>
    <li>one</li>
    <li>two</li>
    </ul>
    </section>
    "###);
}

#[test]
fn test_latex_document_snapshot() {
    let input = "\
Title
=====

Hello **world**.

- one
- two
";
    insta::assert_snapshot!(render(input, OutputFormat::Latex), @r###"
    \section{Title}
    \label{title}
    Hello \textbf{world}.

    \begin{itemize}
    \item one
    \item two
    \end{itemize}
    "###);
}

#[test]
fn test_nested_sections_snapshot() {
    let input = "\
Top
===

Intro text.

Inner
-----

Deep text.
";
    insta::assert_snapshot!(render(input, OutputFormat::Html), @r###"
    <section id="top">
    <h1 id="top">Top</h1>
    <p>Intro text.</p>
    <section id="inner">
    <h2 id="inner">Inner</h2>
    <p>Deep text.</p>
    </section>
    </section>
    "###);
}

#[rstest]
#[case("*soft*\n", "<p><em>soft</em></p>\n")]
#[case("**hard**\n", "<p><strong>hard</strong></p>\n")]
#[case("``code``\n", "<p><code>code</code></p>\n")]
#[case(
    "`site <https://example.com>`_\n",
    "<p><a href=\"https://example.com\">site</a></p>\n"
)]
#[case(
    "https://example.com\n",
    "<p><a href=\"https://example.com\">https://example.com</a></p>\n"
)]
#[case("a < b\n", "<p>a &lt; b</p>\n")]
fn test_inline_html(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, OutputFormat::Html), expected);
}

#[rstest]
#[case("*soft*\n", "\\emph{soft}\n\n")]
#[case("**hard**\n", "\\textbf{hard}\n\n")]
#[case("``code``\n", "\\texttt{code}\n\n")]
#[case("50% off\n", "50\\% off\n\n")]
fn test_inline_latex(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, OutputFormat::Latex), expected);
}

#[test]
fn test_reference_across_documents() {
    let mut parser = Parser::new();
    parser
        .references_mut()
        .add_target("usage", "Usage Guide", "usage.html");

    let document = parser.parse("Read :doc:`usage` first.\n");
    let html = parser.render(&document, OutputFormat::Html);
    assert_eq!(
        html,
        "<p>Read <a href=\"usage.html\">Usage Guide</a> first.</p>\n"
    );
    assert!(parser.errors().is_empty());
}

#[test]
fn test_ref_role_with_anchor() {
    let mut parser = Parser::new();
    parser
        .references_mut()
        .add_target("usage", "Usage Guide", "usage.html");

    let document = parser.parse("See :ref:`tips <usage#tips>`.\n");
    let html = parser.render(&document, OutputFormat::Html);
    assert_eq!(html, "<p>See <a href=\"usage.html#tips\">tips</a>.</p>\n");
}
