//! Table recognition and assembly.
//!
//! Separator lines define the column layout; everything between separators
//! is cell content. Grid tables (`+---+` frames) merge all lines between two
//! separators into one logical row, with a `+===+` separator marking the end
//! of the header. Simple tables (`===  ===` runs) treat each content line as
//! a row; with three separators the lines between the first two form the
//! header.

use crate::environment::Environment;
use crate::nodes::{SpanNode, TableKind, TableNode, TableRow};
use crate::references::ReferenceRegistry;
use crate::span::parser::parse_span;

/// Layout information carried by one separator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSeparatorLineConfig {
    pub kind: TableKind,
    /// `=` separators end a header.
    pub header: bool,
    /// Column ranges as (start, width) in characters.
    pub parts: Vec<(usize, usize)>,
    pub line_char: char,
}

/// Parse a potential separator line.
///
/// Grid separators look like `+---+---+`; simple separators are runs of `=`
/// or `-` split by spaces, at least two runs.
pub fn parse_separator_line(line: &str) -> Option<TableSeparatorLineConfig> {
    let line = line.trim_end();

    if line.starts_with('+') {
        return parse_grid_separator(line);
    }

    parse_simple_separator(line)
}

fn parse_grid_separator(line: &str) -> Option<TableSeparatorLineConfig> {
    let chars: Vec<char> = line.chars().collect();
    let line_char = match chars.get(1) {
        Some('-') => '-',
        Some('=') => '=',
        _ => return None,
    };

    if !chars
        .iter()
        .all(|c| *c == '+' || *c == line_char)
    {
        return None;
    }

    let crosses: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == '+')
        .map(|(i, _)| i)
        .collect();

    if crosses.len() < 2 || *chars.last()? != '+' {
        return None;
    }

    let parts = crosses
        .windows(2)
        .map(|pair| (pair[0] + 1, pair[1] - pair[0] - 1))
        .collect();

    Some(TableSeparatorLineConfig {
        kind: TableKind::Grid,
        header: line_char == '=',
        parts,
        line_char,
    })
}

fn parse_simple_separator(line: &str) -> Option<TableSeparatorLineConfig> {
    let line_char = match line.chars().next() {
        Some(c @ ('=' | '-')) => c,
        _ => return None,
    };

    if !line.chars().all(|c| c == line_char || c == ' ') {
        return None;
    }

    let mut parts = Vec::new();
    let mut start = None;

    for (i, c) in line.chars().enumerate() {
        match (c == line_char, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                parts.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        parts.push((s, line.chars().count() - s));
    }

    // A single run is a separator or title underline, not a table.
    if parts.len() < 2 {
        return None;
    }

    Some(TableSeparatorLineConfig {
        kind: TableKind::Simple,
        header: line_char == '=',
        parts,
        line_char,
    })
}

enum TableLine {
    Separator(TableSeparatorLineConfig),
    Data(String),
}

/// Accumulates table lines and assembles the [`TableNode`].
pub struct TableBuilder {
    entries: Vec<TableLine>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push_separator(&mut self, config: TableSeparatorLineConfig) {
        self.entries.push(TableLine::Separator(config));
    }

    pub fn push_data(&mut self, line: &str) {
        self.entries.push(TableLine::Data(line.trim_end().to_string()));
    }

    pub fn build(
        self,
        environment: &mut Environment,
        references: &ReferenceRegistry,
    ) -> TableNode {
        let layout = self.entries.iter().find_map(|entry| match entry {
            TableLine::Separator(config) => Some(config.clone()),
            TableLine::Data(_) => None,
        });

        let layout = match layout {
            Some(layout) => layout,
            None => {
                environment.add_error("Malformed table: no separator line found");
                return TableNode::new(TableKind::Simple);
            }
        };

        match layout.kind {
            TableKind::Grid => self.build_grid(environment, references, &layout),
            TableKind::Simple => self.build_simple(environment, references, &layout),
        }
    }

    fn build_grid(
        self,
        environment: &mut Environment,
        references: &ReferenceRegistry,
        layout: &TableSeparatorLineConfig,
    ) -> TableNode {
        let mut table = TableNode::new(TableKind::Grid);
        let mut pending: Vec<String> = Vec::new();
        let mut seen_separator = false;

        for entry in self.entries {
            match entry {
                TableLine::Separator(config) => {
                    if !pending.is_empty() {
                        table.rows.push(merge_row(
                            environment,
                            references,
                            &layout.parts,
                            &pending,
                        ));
                        pending.clear();
                    }

                    if config.header {
                        table.header_rows = table.rows.len();
                    }

                    seen_separator = true;
                }
                TableLine::Data(line) => {
                    if !seen_separator {
                        environment
                            .add_error("Malformed table: content before the opening frame");
                        continue;
                    }

                    pending.push(line);
                }
            }
        }

        if !pending.is_empty() {
            environment.add_error("Malformed table: missing closing frame");
            table
                .rows
                .push(merge_row(environment, references, &layout.parts, &pending));
        }

        table
    }

    fn build_simple(
        self,
        environment: &mut Environment,
        references: &ReferenceRegistry,
        layout: &TableSeparatorLineConfig,
    ) -> TableNode {
        let separator_count = self
            .entries
            .iter()
            .filter(|e| matches!(e, TableLine::Separator(_)))
            .count();

        let mut table = TableNode::new(TableKind::Simple);
        let mut separators_seen = 0;

        for entry in &self.entries {
            match entry {
                TableLine::Separator(_) => {
                    separators_seen += 1;
                    if separator_count >= 3 && separators_seen == 2 {
                        table.header_rows = table.rows.len();
                    }
                }
                TableLine::Data(line) => {
                    if separators_seen == 0 {
                        environment
                            .add_error("Malformed table: content before the first separator");
                        continue;
                    }

                    table.rows.push(simple_row(
                        environment,
                        references,
                        &layout.parts,
                        line,
                    ));
                }
            }
        }

        table
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge the lines of one grid row and slice its cells out.
fn merge_row(
    environment: &mut Environment,
    references: &ReferenceRegistry,
    parts: &[(usize, usize)],
    lines: &[String],
) -> TableRow {
    let cells = parts
        .iter()
        .map(|&(start, width)| {
            let text = lines
                .iter()
                .map(|line| slice_chars(line, start, Some(width)).trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("\n");

            let (value, tokens) = parse_span(environment, references, &text);
            SpanNode::new(value, tokens)
        })
        .collect();

    TableRow::new(cells)
}

/// One simple-table row; the last column runs to the end of the line.
fn simple_row(
    environment: &mut Environment,
    references: &ReferenceRegistry,
    parts: &[(usize, usize)],
    line: &str,
) -> TableRow {
    let cells = parts
        .iter()
        .enumerate()
        .map(|(index, &(start, width))| {
            let width = if index + 1 == parts.len() {
                None
            } else {
                Some(width)
            };
            let text = slice_chars(line, start, width).trim().to_string();
            let (value, tokens) = parse_span(environment, references, &text);
            SpanNode::new(value, tokens)
        })
        .collect();

    TableRow::new(cells)
}

fn slice_chars(line: &str, start: usize, width: Option<usize>) -> String {
    let iter = line.chars().skip(start);
    match width {
        Some(width) => iter.take(width).collect(),
        None => iter.collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::environment::ErrorManager;

    fn setup() -> (Environment, ReferenceRegistry) {
        let errors = Rc::new(ErrorManager::new());
        (
            Environment::new(errors.clone()),
            ReferenceRegistry::new(errors),
        )
    }

    fn cell(table: &TableNode, row: usize, col: usize) -> &str {
        &table.rows[row].cells[col].value
    }

    #[test]
    fn test_grid_separator_layout() {
        let config = parse_separator_line("+---+----+").unwrap();
        assert_eq!(config.kind, TableKind::Grid);
        assert!(!config.header);
        assert_eq!(config.parts, vec![(1, 3), (5, 4)]);

        let header = parse_separator_line("+===+====+").unwrap();
        assert!(header.header);
    }

    #[test]
    fn test_simple_separator_layout() {
        let config = parse_separator_line("===  ====").unwrap();
        assert_eq!(config.kind, TableKind::Simple);
        assert_eq!(config.parts, vec![(0, 3), (5, 4)]);
        assert!(config.header);
    }

    #[test]
    fn test_single_run_is_not_a_table() {
        assert!(parse_separator_line("=====").is_none());
        assert!(parse_separator_line("-----").is_none());
        assert!(parse_separator_line("plain text").is_none());
    }

    #[test]
    fn test_grid_table_with_header() {
        let (mut env, refs) = setup();
        let mut builder = TableBuilder::new();
        for line in [
            "+-----+-----+-----+",
            "| a   | b   | c   |",
            "+=====+=====+=====+",
            "| 1   | 2   | 3   |",
            "+-----+-----+-----+",
        ] {
            match parse_separator_line(line) {
                Some(config) => builder.push_separator(config),
                None => builder.push_data(line),
            }
        }

        let table = builder.build(&mut env, &refs);
        assert_eq!(table.kind, TableKind::Grid);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.header_rows, 1);
        assert_eq!(cell(&table, 0, 0), "a");
        assert_eq!(cell(&table, 0, 2), "c");
        assert_eq!(cell(&table, 1, 1), "2");
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_grid_table_merges_multiline_cells() {
        let (mut env, refs) = setup();
        let mut builder = TableBuilder::new();
        for line in [
            "+------+------+",
            "| one  | two  |",
            "| more |      |",
            "+------+------+",
        ] {
            match parse_separator_line(line) {
                Some(config) => builder.push_separator(config),
                None => builder.push_data(line),
            }
        }

        let table = builder.build(&mut env, &refs);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.header_rows, 0);
        assert_eq!(cell(&table, 0, 0), "one\nmore");
        assert_eq!(cell(&table, 0, 1), "two");
    }

    #[test]
    fn test_simple_table_with_header() {
        let (mut env, refs) = setup();
        let mut builder = TableBuilder::new();
        for line in ["====  ====", "h1    h2", "====  ====", "a     b", "====  ===="] {
            match parse_separator_line(line) {
                Some(config) => builder.push_separator(config),
                None => builder.push_data(line),
            }
        }

        let table = builder.build(&mut env, &refs);
        assert_eq!(table.kind, TableKind::Simple);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.header_rows, 1);
        assert_eq!(cell(&table, 0, 0), "h1");
        assert_eq!(cell(&table, 1, 1), "b");
    }

    #[test]
    fn test_malformed_table_is_reported_not_fatal() {
        let (mut env, refs) = setup();
        let mut builder = TableBuilder::new();
        builder.push_data("| orphan |");
        let table = builder.build(&mut env, &refs);
        assert!(table.rows.is_empty());
        assert_eq!(env.error_manager().error_count(), 1);
    }
}
