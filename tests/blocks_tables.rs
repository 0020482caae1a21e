//! Grid and simple table parsing through the full pipeline.

use rst::nodes::{Node, TableKind, TableNode};
use rst::{OutputFormat, Parser};

fn single_table(input: &str) -> TableNode {
    let mut parser = Parser::new();
    let nodes = match parser.parse(input) {
        Node::Document { nodes } => nodes,
        other => panic!("expected document, got {:?}", other),
    };
    assert_eq!(nodes.len(), 1, "expected one node, got {:?}", nodes);
    match nodes.into_iter().next() {
        Some(Node::Table(table)) => table,
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_grid_table_three_columns() {
    let table = single_table(
        "\
+------+------+------+
| h1   | h2   | h3   |
+======+======+======+
| a    | b    | c    |
+------+------+------+
",
    );

    assert_eq!(table.kind, TableKind::Grid);
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.header_rows, 1);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells[0].value, "h1");
    assert_eq!(table.rows[1].cells[2].value, "c");
}

#[test]
fn test_grid_table_without_header() {
    let table = single_table(
        "\
+-----+-----+
| a   | b   |
+-----+-----+
| c   | d   |
+-----+-----+
",
    );

    assert_eq!(table.header_rows, 0);
    assert_eq!(table.rows.len(), 2);
}

#[test]
fn test_simple_table_with_header() {
    let table = single_table(
        "\
=====  =====
first  last
=====  =====
Ada    Byron
=====  =====
",
    );

    assert_eq!(table.kind, TableKind::Simple);
    assert_eq!(table.header_rows, 1);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells[0].value, "first");
    assert_eq!(table.rows[1].cells[1].value, "Byron");
}

#[test]
fn test_table_cells_carry_inline_markup() {
    let mut parser = Parser::new();
    let document = parser.parse(
        "\
+----------+
| **bold** |
+----------+
",
    );
    let html = parser.render(&document, OutputFormat::Html);
    assert!(html.contains("<td><strong>bold</strong></td>"), "{}", html);
}

#[test]
fn test_table_html_shape() {
    let mut parser = Parser::new();
    let document = parser.parse(
        "\
+-----+-----+
| h   | i   |
+=====+=====+
| 1   | 2   |
+-----+-----+
",
    );
    let html = parser.render(&document, OutputFormat::Html);

    assert!(html.contains("<thead>"), "{}", html);
    assert!(html.contains("<th>h</th>"), "{}", html);
    assert!(html.contains("<td>2</td>"), "{}", html);
    assert_eq!(html.matches("<tr>").count(), 2);
}

#[test]
fn test_lone_separator_produces_empty_table() {
    let mut parser = Parser::new();
    parser.parse("=====  =====\n");
    assert!(parser.errors().is_empty());
}

#[test]
fn test_missing_closing_frame_reports_error() {
    let mut parser = Parser::new();
    let document = parser.parse("+-----+-----+\n| a   | b   |\n");
    assert_eq!(parser.errors().len(), 1);

    // The row content still survives.
    match document {
        Node::Document { nodes } => match &nodes[..] {
            [Node::Table(table)] => assert_eq!(table.rows[0].cells[0].value, "a"),
            other => panic!("expected table, got {:?}", other),
        },
        other => panic!("expected document, got {:?}", other),
    }
}
