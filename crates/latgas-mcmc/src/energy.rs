use latgas_core::{Lattice, LatgasError, Site};

/// Counts filled sites among the up/down/left/right neighbours of `site`.
///
/// Neighbours outside the grid do not count; there is no wraparound, so edge
/// sites see at most three neighbours and corners at most two.
pub fn filled_neighbor_count(lattice: &Lattice, site: Site) -> Result<u8, LatgasError> {
    lattice.occupancy_at(site)?;
    let mut count = 0u8;
    for neighbor in neighbors(lattice, site) {
        if lattice.occupancy_at(neighbor)?.is_filled() {
            count += 1;
        }
    }
    Ok(count)
}

/// Energy contribution of a particle with `count` filled neighbours.
pub fn local_energy(count: u8, interaction_energy: f64) -> f64 {
    f64::from(count) * interaction_energy
}

/// Whether two sites share an edge.
pub fn are_adjacent(a: Site, b: Site) -> bool {
    a.manhattan_distance(&b) == 1
}

/// Total configurational energy: `interaction_energy` per filled-filled bond.
///
/// Each bond is counted once, by looking only right and down from every
/// filled site.
pub fn total_energy(lattice: &Lattice, interaction_energy: f64) -> f64 {
    let width = lattice.width();
    let height = lattice.height();
    let cells = lattice.cells();
    let mut bonds = 0usize;
    for row in 0..height {
        for col in 0..width {
            let idx = row * width + col;
            if !cells[idx].is_filled() {
                continue;
            }
            if col + 1 < width && cells[idx + 1].is_filled() {
                bonds += 1;
            }
            if row + 1 < height && cells[idx + width].is_filled() {
                bonds += 1;
            }
        }
    }
    bonds as f64 * interaction_energy
}

fn neighbors(lattice: &Lattice, site: Site) -> impl Iterator<Item = Site> {
    let up = site.row.checked_sub(1).map(|row| Site::new(row, site.col));
    let down = (site.row + 1 < lattice.height()).then_some(Site::new(site.row + 1, site.col));
    let left = site.col.checked_sub(1).map(|col| Site::new(site.row, col));
    let right = (site.col + 1 < lattice.width()).then_some(Site::new(site.row, site.col + 1));
    [up, down, left, right].into_iter().flatten()
}
