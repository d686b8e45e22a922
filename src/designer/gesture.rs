//! Pointer gestures in progress.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Which track list a boundary drag edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Rows,
    Columns,
}

/// The pointer interaction currently in progress.
///
/// Every variant captures what it needs at pointer-down, so pointer-move
/// computes the new state from the start values and the current pointer
/// only.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging a top-level component; `offset` is the pointer position
    /// relative to the component's top-left corner.
    Moving { id: String, offset: Point },
    /// Dragging a component's bottom-right resize handle.
    Resizing {
        id: String,
        start_pointer: Point,
        start_width: f64,
        start_height: f64,
    },
    /// Dragging the boundary after track `index` of a grid.
    Track {
        grid_id: String,
        axis: Axis,
        index: usize,
        start_pointer: Point,
        start_tracks: Vec<f64>,
        /// Rendered size of the grid along `axis`
        extent: f64,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Id of the component the gesture acts on.
    pub fn target(&self) -> Option<&str> {
        match self {
            Gesture::Idle => None,
            Gesture::Moving { id, .. } | Gesture::Resizing { id, .. } => Some(id),
            Gesture::Track { grid_id, .. } => Some(grid_id),
        }
    }
}
