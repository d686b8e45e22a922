//! # Geometry
//!
//! Canvas-space rectangles plus the alignment and snapping rules applied
//! while components are dragged or resized.
//!
//! ## Pipeline
//!
//! ```text
//! pointer ─► clamp to canvas ─► detect guides ─► grid snap ─► guide snap
//!                                    │
//!                                    └─► overlay lines (ephemeral)
//! ```
//!
//! Everything here is a pure function of the current component set. Guides
//! are recomputed from scratch on every pointer move.

mod guides;
mod snap;

pub use guides::{AlignmentGuide, Orientation, detect_alignment_guides};
pub use snap::{snap_resize, snap_to_alignment, snap_to_grid};

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a component in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Move the rectangle so it lies inside the canvas, keeping its size.
    ///
    /// A rectangle larger than the canvas is pinned to the origin.
    pub fn clamp_position(self, canvas: &CanvasConfig) -> Self {
        let max_x = (canvas.width - self.width).max(0.0);
        let max_y = (canvas.height - self.height).max(0.0);
        Self {
            x: self.x.clamp(0.0, max_x),
            y: self.y.clamp(0.0, max_y),
            ..self
        }
    }

    /// Shrink the rectangle so its far edges stay inside the canvas, keeping
    /// its position.
    pub fn clamp_size(self, canvas: &CanvasConfig) -> Self {
        Self {
            width: self.width.min(canvas.width - self.x).max(0.0),
            height: self.height.min(canvas.height - self.y).max(0.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_position_inside_is_noop() {
        let r = Rect::new(10.0, 20.0, 100.0, 45.0);
        assert_eq!(r.clamp_position(&CanvasConfig::DEFAULT), r);
    }

    #[test]
    fn test_clamp_position_far_edge() {
        let r = Rect::new(850.0, 1280.0, 100.0, 45.0).clamp_position(&CanvasConfig::DEFAULT);
        assert_eq!(r.x, 800.0);
        assert_eq!(r.y, 1240.0);
    }

    #[test]
    fn test_clamp_position_negative() {
        let r = Rect::new(-30.0, -1.0, 100.0, 45.0).clamp_position(&CanvasConfig::DEFAULT);
        assert_eq!((r.x, r.y), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_size() {
        let r = Rect::new(800.0, 1200.0, 300.0, 300.0).clamp_size(&CanvasConfig::DEFAULT);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 85.0);
    }
}
