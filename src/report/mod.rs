//! Reporting module for filtered trend data.
//!
//! This module provides:
//! - `TrendTable`: the companion table model for the chart
//! - Plain text and Markdown rendering of that table

pub mod table;

// Re-export key types
pub use table::{
    CellClass, DurationThreshold, TableCell, TableColumn, TableOptions, TableRow, TrendTable,
    build_table, format_value, render_markdown, render_text,
};
