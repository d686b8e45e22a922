//! Alignment guide detection between a moving component and its siblings.

use serde::Serialize;

use super::Rect;

/// Which way a guide line runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// A vertical line at some x; aligns left edges, right edges or centres.
    Vertical,
    /// A horizontal line at some y; aligns top edges, bottom edges or middles.
    Horizontal,
}

/// An ephemeral guide line shown while dragging.
///
/// `position` is the coordinate of the line on its cross axis (x for
/// vertical guides, y for horizontal ones). `start..end` is the span it
/// covers along its own axis: the union of the two aligned boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentGuide {
    pub orientation: Orientation,
    pub position: f64,
    pub start: f64,
    pub end: f64,
}

#[inline]
fn near(a: f64, b: f64, threshold: f64) -> bool {
    (a - b).abs() <= threshold
}

/// Find every guide the moving box nearly coincides with.
///
/// Each sibling is tested independently on both axes, and each of the three
/// alignments per axis (leading edge, trailing edge, centre) can produce its
/// own guide. The guide sits on the sibling's coordinate, not the moving
/// box's, so snapping pulls the moving box onto the sibling.
pub fn detect_alignment_guides<'a>(
    moving: Rect,
    others: impl IntoIterator<Item = &'a Rect>,
    threshold: f64,
) -> Vec<AlignmentGuide> {
    let mut guides = Vec::new();

    for other in others {
        let v_start = moving.y.min(other.y);
        let v_end = moving.bottom().max(other.bottom());
        let vertical = |position| AlignmentGuide {
            orientation: Orientation::Vertical,
            position,
            start: v_start,
            end: v_end,
        };

        if near(moving.x, other.x, threshold) {
            guides.push(vertical(other.x));
        }
        if near(moving.right(), other.right(), threshold) {
            guides.push(vertical(other.right()));
        }
        if near(moving.center_x(), other.center_x(), threshold) {
            guides.push(vertical(other.center_x()));
        }

        let h_start = moving.x.min(other.x);
        let h_end = moving.right().max(other.right());
        let horizontal = |position| AlignmentGuide {
            orientation: Orientation::Horizontal,
            position,
            start: h_start,
            end: h_end,
        };

        if near(moving.y, other.y, threshold) {
            guides.push(horizontal(other.y));
        }
        if near(moving.bottom(), other.bottom(), threshold) {
            guides.push(horizontal(other.bottom()));
        }
        if near(moving.center_y(), other.center_y(), threshold) {
            guides.push(horizontal(other.center_y()));
        }
    }

    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_positions(guides: &[AlignmentGuide]) -> Vec<f64> {
        guides
            .iter()
            .filter(|g| g.orientation == Orientation::Vertical)
            .map(|g| g.position)
            .collect()
    }

    fn horizontal_positions(guides: &[AlignmentGuide]) -> Vec<f64> {
        guides
            .iter()
            .filter(|g| g.orientation == Orientation::Horizontal)
            .map(|g| g.position)
            .collect()
    }

    #[test]
    fn test_left_edge_within_threshold() {
        let moving = Rect::new(103.0, 400.0, 80.0, 40.0);
        let other = Rect::new(100.0, 100.0, 200.0, 50.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        assert_eq!(vertical_positions(&guides), vec![100.0]);
        assert!(horizontal_positions(&guides).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let moving = Rect::new(105.0, 400.0, 80.0, 40.0);
        let other = Rect::new(100.0, 100.0, 200.0, 50.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        assert_eq!(vertical_positions(&guides), vec![100.0]);
    }

    #[test]
    fn test_outside_threshold_no_guide() {
        let moving = Rect::new(106.0, 400.0, 80.0, 40.0);
        let other = Rect::new(100.0, 100.0, 200.0, 50.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        assert!(guides.is_empty());
    }

    #[test]
    fn test_right_and_center_independent() {
        // Same width and nearly same x: left, right and centre all align.
        let moving = Rect::new(52.0, 500.0, 100.0, 40.0);
        let other = Rect::new(50.0, 100.0, 100.0, 40.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        assert_eq!(vertical_positions(&guides), vec![50.0, 150.0, 100.0]);
    }

    #[test]
    fn test_horizontal_top_bottom_middle() {
        let moving = Rect::new(600.0, 201.0, 50.0, 60.0);
        let other = Rect::new(0.0, 200.0, 50.0, 60.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        assert_eq!(horizontal_positions(&guides), vec![200.0, 260.0, 230.0]);
    }

    #[test]
    fn test_span_covers_both_boxes() {
        let moving = Rect::new(100.0, 400.0, 80.0, 40.0);
        let other = Rect::new(100.0, 100.0, 200.0, 50.0);
        let guides = detect_alignment_guides(moving, [&other], 5.0);
        let guide = guides[0];
        assert_eq!(guide.start, 100.0);
        assert_eq!(guide.end, 440.0);
    }

    #[test]
    fn test_multiple_siblings() {
        let moving = Rect::new(100.0, 100.0, 50.0, 50.0);
        let a = Rect::new(100.0, 500.0, 10.0, 10.0);
        let b = Rect::new(700.0, 102.0, 10.0, 10.0);
        let guides = detect_alignment_guides(moving, [&a, &b], 5.0);
        assert_eq!(vertical_positions(&guides), vec![100.0]);
        assert_eq!(horizontal_positions(&guides), vec![102.0]);
    }
}
