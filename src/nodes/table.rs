//! Table node types.

use crate::nodes::SpanNode;

/// The two supported table syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TableKind {
    /// `===  ===` separator rows.
    Simple,
    /// `+---+---+` frames with `|` column borders.
    Grid,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct TableRow {
    pub cells: Vec<SpanNode>,
}

impl TableRow {
    pub fn new(cells: Vec<SpanNode>) -> Self {
        Self { cells }
    }
}

/// A parsed table: rows in order, the first `header_rows` belonging to the
/// header.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableNode {
    pub kind: TableKind,
    pub rows: Vec<TableRow>,
    pub header_rows: usize,
}

impl TableNode {
    pub fn new(kind: TableKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            header_rows: 0,
        }
    }

    pub fn data_rows(&self) -> &[TableRow] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    pub fn header(&self) -> &[TableRow] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0)
    }
}
