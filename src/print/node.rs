//! # Print Nodes
//!
//! The structured print document. Every length carries its unit, so the
//! geometry can be asserted on without parsing markup.
//!
//! ```text
//! PrintDocument
//! └── Page (one per record)
//!     ├── Node::Text   positioned box with a display value
//!     ├── Node::Table  data table with measured columns and rows
//!     └── Node::Grid   grid cells with spans
//! ```

use std::fmt;

use serde::Serialize;

use crate::document::{FontWeight, TextAlign};
use crate::geometry::Rect;

/// A length with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "unit", content = "value")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    pub fn value(self) -> f64 {
        match self {
            Length::Px(v) | Length::Percent(v) => v,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", round2(*v)),
            Length::Percent(v) => write!(f, "{}%", round2(*v)),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Resolved text styling; every default has been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
    pub line_height: f64,
}

/// A positioned box showing one display value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    pub frame: Rect,
    pub style: TextStyle,
    pub text: String,
    /// Framed and centred, like a component that still needs configuring
    pub placeholder: bool,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub width: Length,
    pub align: TextAlign,
    pub rowspan: usize,
    pub colspan: usize,
}

impl Cell {
    pub fn new(text: impl Into<String>, width: Length, align: TextAlign) -> Self {
        Self {
            text: text.into(),
            width,
            align,
            rowspan: 1,
            colspan: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub height: Length,
    pub cells: Vec<Cell>,
}

/// A data table whose height was measured from its content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableNode {
    pub frame: Rect,
    pub style: TextStyle,
    /// Font size of header and body cells
    pub cell_font_size: f64,
    pub cell_line_height: f64,
    pub header_background: String,
    pub header_font_weight: FontWeight,
    pub header: Row,
    pub rows: Vec<Row>,
}

/// A grid with track sizes in percent of its frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridNode {
    pub frame: Rect,
    pub style: TextStyle,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Text(TextNode),
    Table(TableNode),
    Grid(GridNode),
}

impl Node {
    pub fn frame(&self) -> Rect {
        match self {
            Node::Text(n) => n.frame,
            Node::Table(n) => n.frame,
            Node::Grid(n) => n.frame,
        }
    }
}

/// One canvas-sized page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    /// Record the page was filled from, if any
    pub record_id: Option<String>,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintDocument {
    pub width: f64,
    pub height: f64,
    pub pages: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_display() {
        assert_eq!(Length::Px(100.0).to_string(), "100px");
        assert_eq!(Length::Px(31.2).to_string(), "31.2px");
        assert_eq!(Length::Percent(100.0 / 3.0).to_string(), "33.33%");
    }
}
