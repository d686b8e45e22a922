//! # Table Measurement
//!
//! Data table geometry is derived from content at print time. There is no
//! font shaping; text width is estimated from character counts.
//!
//! ## Column widths
//!
//! ```text
//! ideal[i]  = max(min_column, len[i] × avg_char + padding)
//! available = width − (columns + 1)            one border per column edge
//!
//! Σideal > available:  w[i] = max(min_column, ideal[i] × available / Σideal)
//! otherwise:           w[i] = ideal[i] + (available − Σideal) × len[i] / Σlen
//!
//! percent[i] = w[i] / Σw × 100
//! ```
//!
//! ## Row heights
//!
//! ```text
//! chars_per_line = max(1, ⌊(w − padding) / avg_char⌋)
//! cell           = ⌈len / chars_per_line⌉ × font × line_height + row_padding
//! row            = max(font × line_height + row_padding, cell...)
//! ```

use crate::config::PrintConfig;

/// Measured geometry of one data table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetrics {
    /// Font size of the cells
    pub font_size: f64,
    pub column_widths: Vec<f64>,
    pub column_percents: Vec<f64>,
    pub header_height: f64,
    pub row_heights: Vec<f64>,
    /// Total height, replacing the component's configured height
    pub height: f64,
}

/// Number of characters, as the width heuristic counts them.
#[inline]
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Content length of the row-number column for `rows` rows.
///
/// Never below two, the width of the header label.
pub fn row_number_len(rows: usize) -> usize {
    rows.to_string().len().max(2)
}

/// Allocate pixel widths to columns with the given content lengths.
pub fn allocate_columns(
    lengths: &[usize],
    available: f64,
    avg_char: f64,
    config: &PrintConfig,
) -> Vec<f64> {
    let ideal: Vec<f64> = lengths
        .iter()
        .map(|&len| (len as f64 * avg_char + config.cell_padding).max(config.min_column_width))
        .collect();
    let total_ideal: f64 = ideal.iter().sum();

    if total_ideal > available {
        let scale = available / total_ideal;
        return ideal
            .iter()
            .map(|w| (w * scale).max(config.min_column_width))
            .collect();
    }

    let slack = available - total_ideal;
    let weight: usize = lengths.iter().sum();
    if weight == 0 {
        return ideal;
    }
    ideal
        .iter()
        .zip(lengths)
        .map(|(w, &len)| w + slack * len as f64 / weight as f64)
        .collect()
}

/// Widths as percentages of their sum.
pub fn to_percents(widths: &[f64]) -> Vec<f64> {
    let total: f64 = widths.iter().sum();
    if total <= 0.0 {
        return vec![0.0; widths.len()];
    }
    widths.iter().map(|w| w / total * 100.0).collect()
}

/// Height of one body row whose cells have the given lengths, laid out in
/// columns of the given pixel widths.
pub fn row_height(cell_lengths: &[usize], widths: &[f64], font_size: f64, config: &PrintConfig) -> f64 {
    let avg_char = config.avg_char_width(font_size);
    let line = font_size * config.table_line_height;
    let base = line + config.row_padding;

    cell_lengths
        .iter()
        .zip(widths)
        .map(|(&len, &width)| {
            let per_line = ((width - config.cell_padding) / avg_char).floor().max(1.0);
            (len as f64 / per_line).ceil() * line + config.row_padding
        })
        .fold(base, f64::max)
}

/// Measure a table.
///
/// `lengths` are the per-column content lengths (header included); `rows`
/// holds the per-cell text lengths of every body row, in column order.
pub fn measure_table(
    width: f64,
    component_font_size: f64,
    lengths: &[usize],
    rows: &[Vec<usize>],
    config: &PrintConfig,
) -> TableMetrics {
    let font_size = config.table_font_size(component_font_size);
    let avg_char = config.avg_char_width(font_size);
    let available = width - (lengths.len() as f64 + 1.0);

    let column_widths = allocate_columns(lengths, available, avg_char, config);
    let column_percents = to_percents(&column_widths);

    let header_height = font_size * config.table_line_height + config.header_padding;
    let row_heights: Vec<f64> = rows
        .iter()
        .map(|cells| row_height(cells, &column_widths, font_size, config))
        .collect();
    let body: f64 = row_heights.iter().sum();
    let height = (header_height + body + config.table_padding).max(config.min_table_height);

    TableMetrics {
        font_size,
        column_widths,
        column_percents,
        header_height,
        row_heights,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: PrintConfig = PrintConfig::DEFAULT;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_row_number_len() {
        assert_eq!(row_number_len(0), 2);
        assert_eq!(row_number_len(9), 2);
        assert_eq!(row_number_len(100), 3);
    }

    #[test]
    fn test_slack_distributed_by_weight() {
        // avg char 9.6: ideals are max(60, 2×9.6+16)=60 and 10×9.6+16=112
        let widths = allocate_columns(&[2, 10], 292.0, 9.6, &CONFIG);
        let slack = 292.0 - 172.0;
        assert!(approx(widths[0], 60.0 + slack * 2.0 / 12.0));
        assert!(approx(widths[1], 112.0 + slack * 10.0 / 12.0));
        assert!(approx(widths.iter().sum::<f64>(), 292.0));
    }

    #[test]
    fn test_over_budget_scales_with_floor() {
        let widths = allocate_columns(&[2, 100], 200.0, 9.6, &CONFIG);
        // 60 + 976 = 1036 ideal, scaled by 200/1036
        assert_eq!(widths[0], 60.0);
        assert!(approx(widths[1], 976.0 * 200.0 / 1036.0));
    }

    #[test]
    fn test_zero_weight_keeps_ideal() {
        assert_eq!(allocate_columns(&[0, 0], 500.0, 9.6, &CONFIG), vec![60.0, 60.0]);
    }

    #[test]
    fn test_percents_sum_to_100() {
        let p = to_percents(&[60.0, 120.0, 20.0]);
        assert!(approx(p.iter().sum::<f64>(), 100.0));
        assert!(approx(p[1], 60.0));
        assert!(to_percents(&[]).is_empty());
    }

    #[test]
    fn test_row_height_wraps() {
        // 16 px font: avg 9.6, line 22.4; a 117 px column fits 10 chars
        let base = 16.0 * 1.4 + 6.0;
        assert!(approx(row_height(&[10], &[117.0], 16.0, &CONFIG), base));
        assert!(approx(row_height(&[25], &[117.0], 16.0, &CONFIG), 3.0 * 16.0 * 1.4 + 6.0));
        assert!(approx(row_height(&[0], &[117.0], 16.0, &CONFIG), base));
    }

    #[test]
    fn test_measure_empty_table() {
        let m = measure_table(900.0, 18.0, &[2, 4], &[], &CONFIG);
        assert_eq!(m.font_size, 16.0);
        assert!(approx(m.header_height, 16.0 * 1.4 + 8.0));
        assert!(approx(m.height, 16.0 * 1.4 + 8.0 + 10.0));
        assert!(approx(m.column_widths.iter().sum::<f64>(), 897.0));
    }

    #[test]
    fn test_measure_minimum_height() {
        let config = PrintConfig {
            min_table_height: 200.0,
            ..CONFIG
        };
        let m = measure_table(300.0, 12.0, &[3], &[vec![3]], &config);
        assert_eq!(m.height, 200.0);
    }
}
