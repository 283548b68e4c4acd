//! Snapping drag positions to the page's column grid.

use crate::layout::GridCols;

/// Width of one grid column for a canvas `width` pixels wide.
pub fn column_width(width: f64, grid_cols: GridCols) -> f64 {
    width / f64::from(grid_cols.get())
}

/// Snap `x` to the nearest multiple of `grid_size`. Degenerate grid sizes
/// leave `x` unchanged.
pub fn snap_to_grid(x: f64, grid_size: f64) -> f64 {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return x;
    }
    (x / grid_size).round() * grid_size
}
