//! Percentage track sizing for grid rows and columns.
//!
//! A track list holds one percentage per row (or column) and sums to 100.
//! Structural edits replace the list; boundary drags move percentage from
//! one neighbour to the other.

/// Smallest share a track may be dragged down to.
pub const MIN_TRACK_PERCENT: f64 = 5.0;

/// `count` equal shares summing to 100.
pub fn equal_shares(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    vec![100.0 / count as f64; count]
}

/// Produce a track list of length `new_len` from `tracks`.
///
/// Growing discards the existing proportions and resets to equal shares.
/// Shrinking keeps the leading `new_len` entries and rescales them to sum
/// to 100. An unchanged length returns the list as is.
pub fn resize_tracks(tracks: &[f64], new_len: usize) -> Vec<f64> {
    if new_len == 0 {
        return Vec::new();
    }
    if new_len > tracks.len() {
        return equal_shares(new_len);
    }

    let kept = &tracks[..new_len];
    let total: f64 = kept.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return equal_shares(new_len);
    }
    kept.iter().map(|t| t * 100.0 / total).collect()
}

/// Drag the boundary between track `index` and track `index + 1`.
///
/// `delta_px` is the pointer travel since the gesture started and
/// `extent_px` the grid's rendered size along the same axis. The delta is
/// converted to a percentage, added to `index` and taken from `index + 1`,
/// clamped so neither falls below `min_percent`. The total is unchanged.
///
/// Returns `None` when `index` has no following track or the extent is not
/// positive.
pub fn drag_boundary(
    tracks: &[f64],
    index: usize,
    delta_px: f64,
    extent_px: f64,
    min_percent: f64,
) -> Option<Vec<f64>> {
    if index + 1 >= tracks.len() || extent_px <= 0.0 {
        return None;
    }

    let a = tracks[index];
    let b = tracks[index + 1];
    let requested = delta_px * 100.0 / extent_px;

    // Bounds keep both neighbours at or above the minimum. If either is
    // already under it, that side cannot give anything up.
    let lower = (min_percent - a).min(0.0);
    let upper = (b - min_percent).max(0.0);
    let delta = requested.clamp(lower, upper);

    let mut out = tracks.to_vec();
    out[index] = a + delta;
    out[index + 1] = b - delta;
    Some(out)
}
