//! Sparse merge map: origin cell → span.
//!
//! A descriptor at `(r, c)` claims the rectangle `[r, r+rowspan) × [c, c+colspan)`.
//! Cells inside the rectangle other than the origin are covered and never
//! render on their own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CellKey, GridError};

/// How many rows and columns a merged origin cell spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpan {
    pub rowspan: usize,
    pub colspan: usize,
}

impl MergeSpan {
    pub const SINGLE: Self = Self {
        rowspan: 1,
        colspan: 1,
    };

    /// Whether the span anchored at `origin` contains `cell`.
    #[inline]
    pub fn contains(&self, origin: CellKey, cell: CellKey) -> bool {
        cell.row >= origin.row
            && cell.row - origin.row < self.rowspan
            && cell.col >= origin.col
            && cell.col - origin.col < self.colspan
    }
}

impl Default for MergeSpan {
    fn default() -> Self {
        Self::SINGLE
    }
}

pub type MergeMap = BTreeMap<CellKey, MergeSpan>;

/// True iff `(row, col)` lies inside some merge rectangle and is not its origin.
pub fn is_cell_covered(merges: &MergeMap, row: usize, col: usize) -> bool {
    let cell = CellKey::new(row, col);
    merges
        .iter()
        .any(|(&origin, span)| origin != cell && span.contains(origin, cell))
}

/// Every cell currently covered by a merge, in row-major order.
pub fn covered_cells(merges: &MergeMap) -> Vec<CellKey> {
    let mut cells: Vec<CellKey> = merges
        .iter()
        .flat_map(|(&origin, span)| {
            (origin.row..origin.row.saturating_add(span.rowspan)).flat_map(move |r| {
                (origin.col..origin.col.saturating_add(span.colspan))
                    .map(move |c| CellKey::new(r, c))
                    .filter(move |&k| k != origin)
            })
        })
        .collect();
    cells.sort();
    cells.dedup();
    cells
}

/// Merge the rectangle `start..=end` into one cell anchored at `start`.
///
/// Descriptors whose origin lies inside the rectangle (other than `start`)
/// are removed first. A descriptor anchored outside the rectangle whose span
/// reaches into it is an overlap and is rejected; the map is left unchanged.
pub fn merge(
    merges: &mut MergeMap,
    rows: usize,
    columns: usize,
    start: CellKey,
    end: CellKey,
) -> Result<MergeSpan, GridError> {
    if end.row >= rows || end.col >= columns {
        return Err(GridError::OutOfBounds {
            row: end.row,
            col: end.col,
            rows,
            columns,
        });
    }
    if start.row > end.row || start.col > end.col {
        return Err(GridError::InvalidRange { start, end });
    }

    let span = MergeSpan {
        rowspan: end.row - start.row + 1,
        colspan: end.col - start.col + 1,
    };

    let inside = |k: CellKey| span.contains(start, k);
    if let Some((&origin, _)) = merges
        .iter()
        .find(|&(&origin, other)| !inside(origin) && overlaps(start, span, origin, *other))
    {
        return Err(GridError::OverlappingMerge { origin });
    }

    merges.retain(|&origin, _| origin == start || !inside(origin));
    merges.insert(start, span);
    Ok(span)
}

/// Remove the descriptor anchored exactly at `(row, col)`.
pub fn split(merges: &mut MergeMap, row: usize, col: usize) -> Option<MergeSpan> {
    merges.remove(&CellKey::new(row, col))
}

/// Origin of a merge whose rectangle overlaps an earlier one, if any.
pub(super) fn first_overlap(merges: &MergeMap) -> Option<CellKey> {
    let entries: Vec<(CellKey, MergeSpan)> = merges.iter().map(|(&k, &s)| (k, s)).collect();
    entries.iter().enumerate().find_map(|(i, &(origin, span))| {
        entries[..i]
            .iter()
            .any(|&(other, other_span)| overlaps(origin, span, other, other_span))
            .then_some(origin)
    })
}

fn overlaps(a: CellKey, a_span: MergeSpan, b: CellKey, b_span: MergeSpan) -> bool {
    a.row < b.row.saturating_add(b_span.rowspan)
        && b.row < a.row.saturating_add(a_span.rowspan)
        && a.col < b.col.saturating_add(b_span.colspan)
        && b.col < a.col.saturating_add(a_span.colspan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(row: usize, col: usize) -> CellKey {
        CellKey::new(row, col)
    }

    #[test]
    fn test_huge_span_does_not_overflow() {
        let span = MergeSpan {
            rowspan: usize::MAX,
            colspan: 1,
        };
        assert!(span.contains(key(1, 0), key(5, 0)));
        assert!(!span.contains(key(1, 0), key(0, 0)));
        assert!(!span.contains(key(1, 0), key(1, 1)));
    }

    #[test]
    fn test_covered_inside_rectangle_only() {
        let mut merges = MergeMap::new();
        merge(&mut merges, 4, 4, key(1, 1), key(2, 3)).unwrap();

        for r in 0..4 {
            for c in 0..4 {
                let inside = (1..=2).contains(&r) && (1..=3).contains(&c);
                let expected = inside && !(r == 1 && c == 1);
                assert_eq!(is_cell_covered(&merges, r, c), expected, "cell {r}-{c}");
            }
        }
    }

    #[test]
    fn test_merge_then_split_restores() {
        let mut merges = MergeMap::new();
        merge(&mut merges, 3, 3, key(2, 0), key(2, 1)).unwrap();
        let before = covered_cells(&merges);

        merge(&mut merges, 3, 3, key(0, 0), key(1, 2)).unwrap();
        assert_ne!(covered_cells(&merges), before);

        split(&mut merges, 0, 0);
        assert_eq!(covered_cells(&merges), before);
    }

    #[test]
    fn test_merge_sweeps_inner_origins() {
        let mut merges = MergeMap::new();
        merge(&mut merges, 4, 4, key(1, 1), key(1, 2)).unwrap();
        merge(&mut merges, 4, 4, key(0, 0), key(2, 2)).unwrap();
        assert_eq!(merges.len(), 1);
        assert_eq!(
            merges[&key(0, 0)],
            MergeSpan {
                rowspan: 3,
                colspan: 3
            }
        );
    }

    #[test]
    fn test_overlap_from_outside_origin_rejected() {
        let mut merges = MergeMap::new();
        merge(&mut merges, 4, 4, key(0, 0), key(1, 1)).unwrap();
        let err = merge(&mut merges, 4, 4, key(1, 1), key(2, 2)).unwrap_err();
        assert!(matches!(err, GridError::OverlappingMerge { origin } if origin == key(0, 0)));
        assert_eq!(merges.len(), 1);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let mut merges = MergeMap::new();
        let err = merge(&mut merges, 4, 4, key(2, 2), key(1, 1)).unwrap_err();
        assert!(matches!(err, GridError::InvalidRange { .. }));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut merges = MergeMap::new();
        let err = merge(&mut merges, 2, 4, key(0, 0), key(2, 0)).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { .. }));
    }

    #[test]
    fn test_split_other_key_is_noop() {
        let mut merges = MergeMap::new();
        merge(&mut merges, 2, 2, key(0, 0), key(1, 1)).unwrap();
        assert!(split(&mut merges, 1, 1).is_none());
        assert!(is_cell_covered(&merges, 1, 1));
    }
}
