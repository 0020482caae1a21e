//! Block-level parsing.
//!
//! [`document::DocumentParser`] drives the per-line state; the sibling
//! modules hold the pure helpers it dispatches through: line classification,
//! structured line data, table assembly and section tracking.

pub mod document;
pub mod line_checker;
pub mod line_data;
pub mod sections;
pub mod table;

pub use document::DocumentParser;
