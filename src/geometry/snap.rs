//! Grid and guide snapping for drag and resize gestures.

use super::guides::{AlignmentGuide, Orientation};
use super::{Point, Rect};
use crate::config::CanvasConfig;

/// Snap a single coordinate to the nearest grid line if it is close enough.
///
/// Returns `None` when the nearest grid line is farther than the grid
/// threshold.
pub fn snap_to_grid(value: f64, config: &CanvasConfig) -> Option<f64> {
    if config.grid_size <= 0.0 {
        return None;
    }
    let nearest = (value / config.grid_size).round() * config.grid_size;
    ((value - nearest).abs() <= config.grid_threshold).then_some(nearest)
}

/// Correct a candidate drag position using the grid and the current guides.
///
/// Grid snapping is applied first, then every guide within the guide
/// threshold overrides it. For each guide the leading edge, trailing edge
/// and centre are tested in that order, so a later match wins. Guides
/// always take priority over the grid.
pub fn snap_to_alignment(rect: Rect, guides: &[AlignmentGuide], config: &CanvasConfig) -> Point {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;
    let threshold = config.guide_threshold;

    let mut snapped = Point {
        x: snap_to_grid(x, config).unwrap_or(x),
        y: snap_to_grid(y, config).unwrap_or(y),
    };

    for guide in guides {
        let p = guide.position;
        match guide.orientation {
            Orientation::Vertical => {
                if (x - p).abs() <= threshold {
                    snapped.x = p;
                }
                if (x + width - p).abs() <= threshold {
                    snapped.x = p - width;
                }
                if (x + width / 2.0 - p).abs() <= threshold {
                    snapped.x = p - width / 2.0;
                }
            }
            Orientation::Horizontal => {
                if (y - p).abs() <= threshold {
                    snapped.y = p;
                }
                if (y + height - p).abs() <= threshold {
                    snapped.y = p - height;
                }
                if (y + height / 2.0 - p).abs() <= threshold {
                    snapped.y = p - height / 2.0;
                }
            }
        }
    }

    snapped
}

/// Correct a candidate size during a resize gesture.
///
/// The size is floored at the configured minimum, then snapped to a grid
/// multiple when within threshold and the multiple still respects the
/// minimum. Guides are not consulted while resizing.
pub fn snap_resize(width: f64, height: f64, config: &CanvasConfig) -> (f64, f64) {
    let width = width.max(config.min_width);
    let height = height.max(config.min_height);

    let width = match snap_to_grid(width, config) {
        Some(w) if w >= config.min_width => w,
        _ => width,
    };
    let height = match snap_to_grid(height, config) {
        Some(h) if h >= config.min_height => h,
        _ => height,
    };

    (width, height)
}
