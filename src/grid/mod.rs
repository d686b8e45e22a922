//! # Grid Cell Model
//!
//! A grid component carries its own rows × columns sub-layout:
//!
//! - per-row heights and per-column widths as percentages of the component
//!   size (each list sums to 100),
//! - a sparse merge map keyed by origin cell,
//! - a sparse map from cell to the ids of the components dropped into it.
//!
//! Cell contents are ids into the canvas arena (see
//! [`ComponentTree`](crate::document::ComponentTree)); the grid never owns
//! component data.
//!
//! ```text
//!        col 0   col 1   col 2   col 3
//!       ┌───────────────┬───────┬───────┐
//! row 0 │ 0-0 (colspan 2)│  0-2  │  0-3  │  50%
//!       ├───────┬───────┼───────┼───────┤
//! row 1 │  1-0  │  1-1  │  1-2  │  1-3  │  50%
//!       └───────┴───────┴───────┴───────┘
//!          25%     25%     25%     25%
//! ```

mod merge;
mod tracks;

pub use merge::{MergeMap, MergeSpan, covered_cells, is_cell_covered};
pub use tracks::{MIN_TRACK_PERCENT, drag_boundary, equal_shares, resize_tracks};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest row or column count a grid accepts.
pub const MAX_TRACKS: usize = 20;

/// Errors from structural grid edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {row}-{col} is outside a {rows}x{columns} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    #[error("merge range {start} to {end} is reversed")]
    InvalidRange { start: CellKey, end: CellKey },

    #[error("merge overlaps the merged cell anchored at {origin}")]
    OverlappingMerge { origin: CellKey },

    #[error("merged cell at {origin} spans {rowspan}x{colspan}, outside the grid")]
    InvalidSpan {
        origin: CellKey,
        rowspan: usize,
        colspan: usize,
    },

    #[error("grid of {rows}x{columns} is outside 1..={max} tracks", max = MAX_TRACKS)]
    TrackCount { rows: usize, columns: usize },

    #[error("component {0} is not a grid")]
    NotAGrid(String),

    #[error("invalid cell key '{0}', expected 'row-col'")]
    InvalidKey(String),
}

/// A cell coordinate, written `"row-col"` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GridError::InvalidKey(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            row: row.trim().parse().map_err(|_| invalid())?,
            col: col.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn default_rows() -> usize {
    2
}

fn default_columns() -> usize {
    4
}

/// Rows × columns sub-layout of a grid component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_columns")]
    pub columns: usize,
    /// Percentage of the component height per row.
    #[serde(default)]
    pub row_heights: Vec<f64>,
    /// Percentage of the component width per column.
    #[serde(default)]
    pub column_widths: Vec<f64>,
    #[serde(default)]
    pub merges: MergeMap,
    /// Ids of the components placed in each cell, first one is displayed.
    #[serde(default)]
    pub cells: BTreeMap<CellKey, Vec<String>>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(default_rows(), default_columns())
    }
}

impl GridLayout {
    /// An empty grid with equal row heights and column widths.
    pub fn new(rows: usize, columns: usize) -> Self {
        let rows = rows.clamp(1, MAX_TRACKS);
        let columns = columns.clamp(1, MAX_TRACKS);
        Self {
            rows,
            columns,
            row_heights: equal_shares(rows),
            column_widths: equal_shares(columns),
            merges: MergeMap::new(),
            cells: BTreeMap::new(),
        }
    }

    /// Height share of `row`, falling back to an equal share when the list
    /// is short.
    pub fn row_height(&self, row: usize) -> f64 {
        self.row_heights
            .get(row)
            .copied()
            .unwrap_or(100.0 / self.rows.max(1) as f64)
    }

    /// Width share of `col`, falling back to an equal share when the list
    /// is short.
    pub fn column_width(&self, col: usize) -> f64 {
        self.column_widths
            .get(col)
            .copied()
            .unwrap_or(100.0 / self.columns.max(1) as f64)
    }

    pub fn contains(&self, key: CellKey) -> bool {
        key.row < self.rows && key.col < self.columns
    }

    pub fn check_bounds(&self, key: CellKey) -> Result<(), GridError> {
        if self.contains(key) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: key.row,
                col: key.col,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Check a grid read from outside: track counts, merge rectangles and
    /// cell keys must all lie inside the grid, and merges must not overlap.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(1..=MAX_TRACKS).contains(&self.rows) || !(1..=MAX_TRACKS).contains(&self.columns) {
            return Err(GridError::TrackCount {
                rows: self.rows,
                columns: self.columns,
            });
        }
        for (&origin, span) in &self.merges {
            self.check_bounds(origin)?;
            if span.rowspan == 0
                || span.colspan == 0
                || span.rowspan > self.rows - origin.row
                || span.colspan > self.columns - origin.col
            {
                return Err(GridError::InvalidSpan {
                    origin,
                    rowspan: span.rowspan,
                    colspan: span.colspan,
                });
            }
        }
        if let Some(origin) = merge::first_overlap(&self.merges) {
            return Err(GridError::OverlappingMerge { origin });
        }
        for key in self.cells.keys() {
            self.check_bounds(*key)?;
        }
        Ok(())
    }

    pub fn is_covered(&self, row: usize, col: usize) -> bool {
        is_cell_covered(&self.merges, row, col)
    }

    /// Span of the cell at `key`: its merge descriptor or a single cell.
    pub fn span_at(&self, key: CellKey) -> MergeSpan {
        self.merges.get(&key).copied().unwrap_or_default()
    }

    /// Cells that render, in row-major order, each with its span.
    pub fn visible_cells(&self) -> impl Iterator<Item = (CellKey, MergeSpan)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns)
                .filter(move |&col| !self.is_covered(row, col))
                .map(move |col| {
                    let key = CellKey::new(row, col);
                    (key, self.span_at(key))
                })
        })
    }

    /// Ids placed in the cell, empty when none.
    pub fn cell(&self, key: CellKey) -> &[String] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn merge(&mut self, start: CellKey, end: CellKey) -> Result<MergeSpan, GridError> {
        self.check_bounds(start)?;
        merge::merge(&mut self.merges, self.rows, self.columns, start, end)
    }

    pub fn split(&mut self, row: usize, col: usize) -> Option<MergeSpan> {
        merge::split(&mut self.merges, row, col)
    }

    /// Change the row count.
    ///
    /// Returns the ids of components whose cells fell outside the grid; the
    /// caller removes them from the arena.
    pub fn set_rows(&mut self, rows: usize) -> Vec<String> {
        let rows = rows.clamp(1, MAX_TRACKS);
        self.row_heights = resize_tracks(&self.aligned_row_heights(), rows);
        self.rows = rows;
        self.prune()
    }

    /// Change the column count. See [`GridLayout::set_rows`].
    pub fn set_columns(&mut self, columns: usize) -> Vec<String> {
        let columns = columns.clamp(1, MAX_TRACKS);
        self.column_widths = resize_tracks(&self.aligned_column_widths(), columns);
        self.columns = columns;
        self.prune()
    }

    /// Drag the boundary below `row` by `delta_px` on a grid `height_px` tall.
    pub fn drag_row_boundary(&mut self, row: usize, delta_px: f64, height_px: f64) -> bool {
        self.drag_row_boundary_from(&self.aligned_row_heights(), row, delta_px, height_px)
    }

    /// Drag the boundary right of `col` by `delta_px` on a grid `width_px` wide.
    pub fn drag_column_boundary(&mut self, col: usize, delta_px: f64, width_px: f64) -> bool {
        self.drag_column_boundary_from(&self.aligned_column_widths(), col, delta_px, width_px)
    }

    /// Like [`GridLayout::drag_row_boundary`], measuring the delta against
    /// the heights captured when the gesture started.
    pub fn drag_row_boundary_from(
        &mut self,
        start: &[f64],
        row: usize,
        delta_px: f64,
        height_px: f64,
    ) -> bool {
        match drag_boundary(start, row, delta_px, height_px, MIN_TRACK_PERCENT) {
            Some(heights) => {
                self.row_heights = heights;
                true
            }
            None => false,
        }
    }

    pub fn drag_column_boundary_from(
        &mut self,
        start: &[f64],
        col: usize,
        delta_px: f64,
        width_px: f64,
    ) -> bool {
        match drag_boundary(start, col, delta_px, width_px, MIN_TRACK_PERCENT) {
            Some(widths) => {
                self.column_widths = widths;
                true
            }
            None => false,
        }
    }

    /// Row heights with one entry per row, filling gaps with equal shares.
    pub fn aligned_row_heights(&self) -> Vec<f64> {
        if self.row_heights.len() == self.rows {
            self.row_heights.clone()
        } else {
            equal_shares(self.rows)
        }
    }

    pub fn aligned_column_widths(&self) -> Vec<f64> {
        if self.column_widths.len() == self.columns {
            self.column_widths.clone()
        } else {
            equal_shares(self.columns)
        }
    }

    /// Every component id placed anywhere in the grid.
    pub fn all_component_ids(&self) -> impl Iterator<Item = &String> {
        self.cells.values().flatten()
    }

    /// Drop merges and cell contents outside the current bounds and clip
    /// spans that run past the edge.
    fn prune(&mut self) -> Vec<String> {
        let (rows, columns) = (self.rows, self.columns);
        self.merges.retain(|k, _| k.row < rows && k.col < columns);
        for (origin, span) in self.merges.iter_mut() {
            span.rowspan = span.rowspan.min(rows - origin.row);
            span.colspan = span.colspan.min(columns - origin.col);
        }
        self.merges.retain(|_, span| *span != MergeSpan::SINGLE);

        let mut removed = Vec::new();
        self.cells.retain(|k, ids| {
            let keep = k.row < rows && k.col < columns;
            if !keep {
                removed.append(ids);
            }
            keep
        });
        removed
    }
}
