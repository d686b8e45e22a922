//! # Canvas and Print Configuration
//!
//! Fixed dimensions and heuristics shared by the designer and the print
//! compiler.
//!
//! ## Canvas
//!
//! | Property | Value |
//! |----------|-------|
//! | Canvas size | 900 × 1285 px |
//! | Snap grid | 45 px |
//! | Grid snap threshold | 10 px |
//! | Guide threshold | 5 px |
//! | Minimum component size | 50 × 30 px |
//!
//! ## Usage
//!
//! ```
//! use folio::config::CanvasConfig;
//!
//! let config = CanvasConfig::DEFAULT;
//! assert_eq!(config.grid_size, 45.0);
//! ```

use serde::{Deserialize, Serialize};

/// # Canvas Configuration
///
/// Describes the positioning surface and the snapping policy applied while
/// dragging and resizing components.
///
/// ```text
/// ┌──────────── 900 px ────────────┐
/// │ ·    ·    ·    ·    ·    ·     │  45 px snap grid
/// │ ·    ·  ┌──────┐ ·    ·    ·   │
/// │ ·    ·  │ comp │ ·    ·    ·   │  1285 px
/// │ ·    ·  └──────┘ ·    ·    ·   │
/// └────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Canvas width in pixels
    pub width: f64,

    /// Canvas height in pixels
    pub height: f64,

    /// Spacing of the snap grid
    pub grid_size: f64,

    /// Maximum distance from a grid line at which grid snapping applies
    pub grid_threshold: f64,

    /// Maximum distance between edges/centres at which a guide is produced
    pub guide_threshold: f64,

    /// Smallest width a resize may produce
    pub min_width: f64,

    /// Smallest height a resize may produce
    pub min_height: f64,

    /// Horizontal offset between the drop point and the new component's left edge
    pub drop_offset_x: f64,

    /// Vertical offset between the drop point and the new component's top edge
    pub drop_offset_y: f64,
}

impl CanvasConfig {
    /// Portrait page canvas used by the designer.
    pub const DEFAULT: Self = Self {
        width: 900.0,
        height: 1285.0,
        grid_size: 45.0,
        grid_threshold: 10.0,
        guide_threshold: 5.0,
        min_width: 50.0,
        min_height: 30.0,
        drop_offset_x: 50.0,
        drop_offset_y: 25.0,
    };
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// # Print Measurement Configuration
///
/// Heuristics used to derive table geometry from content at print time.
/// There is no font shaping: text width is estimated as
/// `chars × font_size × char_width_ratio`.
///
/// ## Calculations
///
/// ```text
/// font      = max(min_font_size, font_size - 2)
/// avg_char  = font × char_width_ratio
/// ideal_col = max(min_column_width, len × avg_char + cell_padding)
/// row       = lines × font × line_height + row_padding
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Narrowest column the allocator will produce
    pub min_column_width: f64,

    /// Horizontal padding inside a table cell (both sides)
    pub cell_padding: f64,

    /// Average glyph width as a fraction of the font size
    pub char_width_ratio: f64,

    /// Line height multiplier used inside data tables
    pub table_line_height: f64,

    /// Extra height added to the header row
    pub header_padding: f64,

    /// Extra height added to every body row
    pub row_padding: f64,

    /// Extra height added below the last row
    pub table_padding: f64,

    /// Smallest height a rendered table may have
    pub min_table_height: f64,

    /// Smallest font size used for table cells
    pub min_font_size: f64,

    /// Page size used for the full-table record fetch
    pub record_page_size: usize,
}

impl PrintConfig {
    pub const DEFAULT: Self = Self {
        min_column_width: 60.0,
        cell_padding: 16.0,
        char_width_ratio: 0.6,
        table_line_height: 1.4,
        header_padding: 8.0,
        row_padding: 6.0,
        table_padding: 10.0,
        min_table_height: 40.0,
        min_font_size: 10.0,
        record_page_size: 5000,
    };

    /// Font size used inside a data table whose component font size is `font_size`.
    #[inline]
    pub fn table_font_size(&self, font_size: f64) -> f64 {
        (font_size - 2.0).max(self.min_font_size)
    }

    /// Estimated width of one character at `font_size`.
    #[inline]
    pub fn avg_char_width(&self, font_size: f64) -> f64 {
        font_size * self.char_width_ratio
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_font_size_floor() {
        let config = PrintConfig::DEFAULT;
        assert_eq!(config.table_font_size(18.0), 16.0);
        assert_eq!(config.table_font_size(8.0), 10.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CanvasConfig = serde_json::from_str(r#"{"width": 600}"#).unwrap();
        assert_eq!(config.width, 600.0);
        assert_eq!(config.height, 1285.0);
        assert_eq!(config.grid_size, 45.0);
    }
}
