//! # Print Compiler
//!
//! Turns the component tree into a printable document.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌──────────┐     ┌─────────────┐     ┌──────┐
//! │ComponentTree │ ──► │  gather  │ ──► │   compile   │ ──► │ HTML │
//! │              │     │ (async)  │     │   (pure)    │     │      │
//! └──────────────┘     └──────────┘     └─────────────┘     └──────┘
//!                       records per      PrintDocument
//!                       data table       → Page → Node
//! ```
//!
//! [`gather`] is the only step that talks to the host. [`compile`] is pure:
//! given the tree and the gathered records it always produces the same
//! document, so its geometry can be tested without a host.
//!
//! ## Example
//!
//! ```
//! use folio::config::{CanvasConfig, PrintConfig};
//! use folio::document::{Component, ComponentKind, ComponentTree, TextBlock};
//! use folio::print::{PrintData, compile};
//! use folio::value::RecordView;
//!
//! let mut tree = ComponentTree::new();
//! tree.add(Component::new("t1", "Text", ComponentKind::Text(TextBlock::new("Hello"))))?;
//!
//! let doc = compile(
//!     &tree,
//!     &PrintData::default(),
//!     &[RecordView::default()],
//!     &CanvasConfig::DEFAULT,
//!     &PrintConfig::DEFAULT,
//! );
//! assert_eq!(doc.pages.len(), 1);
//! assert!(doc.to_html().contains("Hello"));
//! # Ok::<(), folio::error::FolioError>(())
//! ```

mod html;
mod measure;
mod node;

pub use html::escape;
pub use measure::{
    TableMetrics, allocate_columns, measure_table, row_height, row_number_len, text_len,
    to_percents,
};
pub use node::*;

use std::collections::HashMap;

use futures_util::future::join_all;
use tracing::debug;

use crate::config::{CanvasConfig, PrintConfig};
use crate::document::{Component, ComponentKind, ComponentTree, DataTable, FontWeight, TextAlign};
use crate::geometry::Rect;
use crate::grid::GridLayout;
use crate::host::{self, HostApi, Record};
use crate::value::{
    DEFAULT_FONT_SIZE, DEFAULT_LINE_HEIGHT, RecordView, component_display, format_field_value,
};

/// Text printed in a data table with no fields to show.
pub const NO_FIELDS_LABEL: &str = "Select fields to display";

/// Header of the row-number column.
pub const ROW_NUMBER_LABEL: &str = "No.";

/// Text printed in a grid cell with no component.
pub const EMPTY_CELL_MARKER: &str = "/";

pub const DEFAULT_COLOR: &str = "#000000";
pub const DEFAULT_HEADER_BACKGROUND: &str = "#f5f5f5";

/// Grids print smaller than free-standing boxes.
pub const GRID_FONT_SIZE: f64 = 14.0;

/// Records fetched for each printable data table, keyed by component id.
#[derive(Debug, Clone, Default)]
pub struct PrintData {
    tables: HashMap<String, Vec<Record>>,
}

impl PrintData {
    pub fn insert(&mut self, component_id: impl Into<String>, records: Vec<Record>) {
        self.tables.insert(component_id.into(), records);
    }

    /// Records of a data table component; empty if none were gathered.
    pub fn records(&self, component_id: &str) -> &[Record] {
        self.tables
            .get(component_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Whether a component prints as a measured table.
fn printable_table(component: &Component) -> Option<(&DataTable, &str)> {
    let table = component.as_table()?;
    let table_id = table.table_id.as_deref()?;
    (!table.fields.is_empty()).then_some((table, table_id))
}

/// Fetch the records every bound data table on the canvas prints.
///
/// Tables are fetched concurrently. Failed fetches print as empty tables.
pub async fn gather(tree: &ComponentTree, host: &dyn HostApi, config: &PrintConfig) -> PrintData {
    let fetches = tree
        .top_level()
        .filter_map(|c| printable_table(c).map(|(t, table_id)| (c, t, table_id)))
        .filter(|(_, t, _)| !t.fields_to_show().is_empty())
        .map(|(c, t, table_id)| async move {
            let records = host::fetch_records(host, table_id, t.scope, config.record_page_size).await;
            debug!(component = %c.id, table_id, records = records.len(), "gathered records");
            (c.id.clone(), records)
        });

    let mut data = PrintData::default();
    for (id, records) in join_all(fetches).await {
        data.insert(id, records);
    }
    data
}

/// Compile the canvas into a document with one page per record view.
///
/// Pass a single `RecordView` without a record to print one page that
/// shows field names.
pub fn compile(
    tree: &ComponentTree,
    data: &PrintData,
    views: &[RecordView<'_>],
    canvas: &CanvasConfig,
    config: &PrintConfig,
) -> PrintDocument {
    let pages = views
        .iter()
        .map(|view| Page {
            record_id: view.record.map(|r| r.id.clone()),
            nodes: tree
                .top_level()
                .map(|c| compile_component(c, tree, data, *view, config))
                .collect(),
        })
        .collect();

    PrintDocument {
        width: canvas.width,
        height: canvas.height,
        pages,
    }
}

fn compile_component(
    component: &Component,
    tree: &ComponentTree,
    data: &PrintData,
    view: RecordView<'_>,
    config: &PrintConfig,
) -> Node {
    match &component.kind {
        ComponentKind::Grid(grid) => Node::Grid(grid_node(component, grid, tree, view)),
        ComponentKind::Table(_) => match printable_table(component) {
            Some((table, _)) if table.fields_to_show().is_empty() => Node::Text(TextNode {
                frame: component.rect(),
                style: text_style(component, DEFAULT_FONT_SIZE, TextAlign::Center),
                text: NO_FIELDS_LABEL.to_string(),
                placeholder: true,
            }),
            Some((table, _)) => Node::Table(table_node(
                component,
                table,
                data.records(&component.id),
                config,
            )),
            None => Node::Text(TextNode {
                frame: component.rect(),
                style: text_style(component, DEFAULT_FONT_SIZE, TextAlign::Left),
                text: component_display(component, view).into_label(),
                placeholder: true,
            }),
        },
        _ => Node::Text(TextNode {
            frame: component.rect(),
            style: text_style(component, DEFAULT_FONT_SIZE, TextAlign::Left),
            text: component_display(component, view).into_label(),
            placeholder: false,
        }),
    }
}

fn text_style(component: &Component, font_size: f64, align: TextAlign) -> TextStyle {
    let style = &component.style;
    TextStyle {
        font_size: style.font_size_or(font_size),
        color: style.color_or(DEFAULT_COLOR).to_string(),
        font_weight: style.font_weight.unwrap_or_default(),
        text_align: style.text_align.unwrap_or(align),
        line_height: style.line_height_or(DEFAULT_LINE_HEIGHT),
    }
}

// ============================================================================
// DATA TABLE
// ============================================================================

fn table_node(
    component: &Component,
    table: &DataTable,
    records: &[Record],
    config: &PrintConfig,
) -> TableNode {
    let fields = table.fields_to_show();

    let mut headers: Vec<String> = Vec::new();
    let mut lengths: Vec<usize> = Vec::new();
    if table.show_row_number {
        headers.push(ROW_NUMBER_LABEL.to_string());
        lengths.push(row_number_len(records.len()));
    }
    for field in &fields {
        headers.push(field.name.clone());
        lengths.push(text_len(&field.name));
    }

    let body: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mut cells = Vec::with_capacity(headers.len());
            if table.show_row_number {
                cells.push((i + 1).to_string());
            }
            for field in &fields {
                cells.push(format_field_value(record.value(&field.id), Some(field.field_type)));
            }
            cells
        })
        .collect();

    let offset = usize::from(table.show_row_number);
    for row in &body {
        for (col, text) in row.iter().enumerate().skip(offset) {
            lengths[col] = lengths[col].max(text_len(text));
        }
    }

    let cell_lengths: Vec<Vec<usize>> = body
        .iter()
        .map(|row| row.iter().map(|t| text_len(t)).collect())
        .collect();
    let style = text_style(component, DEFAULT_FONT_SIZE, TextAlign::Left);
    let metrics = measure_table(component.width, style.font_size, &lengths, &cell_lengths, config);
    debug!(
        component = %component.id,
        columns = lengths.len(),
        rows = body.len(),
        height = metrics.height,
        "measured table"
    );

    let width = |col: usize| Length::Percent(metrics.column_percents[col]);
    let header = Row {
        height: Length::Px(metrics.header_height),
        cells: headers
            .into_iter()
            .enumerate()
            .map(|(col, text)| Cell::new(text, width(col), TextAlign::Center))
            .collect(),
    };
    let rows = body
        .into_iter()
        .zip(&metrics.row_heights)
        .map(|(cells, &height)| Row {
            height: Length::Px(height),
            cells: cells
                .into_iter()
                .enumerate()
                .map(|(col, text)| {
                    let align = if col < offset {
                        TextAlign::Center
                    } else {
                        style.text_align
                    };
                    Cell::new(text, width(col), align)
                })
                .collect(),
        })
        .collect();

    TableNode {
        frame: Rect {
            height: metrics.height,
            ..component.rect()
        },
        cell_font_size: metrics.font_size,
        cell_line_height: config.table_line_height,
        header_background: table
            .header
            .background
            .clone()
            .unwrap_or_else(|| DEFAULT_HEADER_BACKGROUND.to_string()),
        header_font_weight: table.header.font_weight.unwrap_or(FontWeight::Bold),
        style,
        header,
        rows,
    }
}

// ============================================================================
// GRID
// ============================================================================

fn grid_node(
    component: &Component,
    grid: &GridLayout,
    tree: &ComponentTree,
    view: RecordView<'_>,
) -> GridNode {
    let style = text_style(component, GRID_FONT_SIZE, TextAlign::Center);
    let mut rows: Vec<Row> = (0..grid.rows)
        .map(|row| Row {
            height: Length::Percent(grid.row_height(row)),
            cells: Vec::new(),
        })
        .collect();

    for (key, span) in grid.visible_cells() {
        let text = tree
            .first_in_cell(&component.id, key)
            .map(|nested| component_display(nested, view).into_label())
            .unwrap_or_else(|| EMPTY_CELL_MARKER.to_string());
        let mut cell = Cell::new(text, Length::Percent(grid.column_width(key.col)), style.text_align);
        cell.rowspan = span.rowspan;
        cell.colspan = span.colspan;
        if let Some(row) = rows.get_mut(key.row) {
            row.cells.push(cell);
        }
    }

    GridNode {
        frame: component.rect(),
        style,
        rows,
    }
}
