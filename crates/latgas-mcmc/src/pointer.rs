use latgas_core::Site;

/// Maps a point on a rendered surface to the lattice site drawn under it.
///
/// The surface is split proportionally into `lattice_width` x
/// `lattice_height` cells and the scaled coordinates are floored. Points
/// outside the surface (including NaN and the far edge, which floating-point
/// rounding can push one cell past the grid) map to `None`.
pub fn cell_at(
    x: f64,
    y: f64,
    surface_width: f64,
    surface_height: f64,
    lattice_width: usize,
    lattice_height: usize,
) -> Option<Site> {
    if surface_width.is_nan() || surface_height.is_nan() {
        return None;
    }
    if surface_width <= 0.0 || surface_height <= 0.0 {
        return None;
    }
    let col = scaled_index(x / surface_width, lattice_width)?;
    let row = scaled_index(y / surface_height, lattice_height)?;
    Some(Site::new(row, col))
}

fn scaled_index(fraction: f64, cells: usize) -> Option<usize> {
    let scaled = (fraction * cells as f64).floor();
    if scaled.is_nan() || scaled < 0.0 || scaled >= cells as f64 {
        return None;
    }
    Some(scaled as usize)
}
