//! Occupancy grid for the lattice gas.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, LatgasError};
use crate::snapshot::LatticeSnapshot;

/// State of a single lattice site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Occupancy {
    /// Vacant site.
    #[default]
    Empty = 0,
    /// Site holding a particle.
    Filled = 1,
}

impl Occupancy {
    /// Returns `true` for [`Occupancy::Filled`].
    pub fn is_filled(self) -> bool {
        matches!(self, Occupancy::Filled)
    }

    /// Returns the opposite occupancy.
    pub fn flipped(self) -> Self {
        match self {
            Occupancy::Empty => Occupancy::Filled,
            Occupancy::Filled => Occupancy::Empty,
        }
    }
}

/// Row/column coordinate on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Site {
    /// Row index in `[0, height)`.
    pub row: usize,
    /// Column index in `[0, width)`.
    pub col: usize,
}

impl Site {
    /// Creates a site from its row and column.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two sites.
    pub fn manhattan_distance(&self, other: &Site) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Rectangular occupancy grid stored row-major.
///
/// The lattice caches its occupied-site count; every mutation path goes through
/// [`Lattice::toggle`] or [`Lattice::set_occupancy`], which keep it exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lattice {
    width: usize,
    height: usize,
    cells: Vec<Occupancy>,
    occupied: usize,
}

impl Lattice {
    /// Allocates a `width` x `height` lattice with every site empty.
    pub fn empty(width: usize, height: usize) -> Result<Self, LatgasError> {
        let total = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![Occupancy::Empty; total],
            occupied: 0,
        })
    }

    /// Builds a lattice with `min(initial_filled, width * height)` filled sites.
    ///
    /// The filled sites form a uniformly random subset drawn without
    /// replacement, so generation terminates in bounded time even when the
    /// request saturates the grid.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        initial_filled: usize,
        rng: &mut R,
    ) -> Result<Self, LatgasError> {
        let mut lattice = Self::empty(width, height)?;
        let total = lattice.cells.len();
        let target = initial_filled.min(total);
        if target == 0 {
            return Ok(lattice);
        }
        for idx in index::sample(rng, total, target).into_iter() {
            lattice.cells[idx] = Occupancy::Filled;
        }
        lattice.occupied = target;
        Ok(lattice)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of sites.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the lattice has no sites at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of filled sites.
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    /// Whether `site` lies inside the grid.
    pub fn contains(&self, site: Site) -> bool {
        site.row < self.height && site.col < self.width
    }

    /// Occupancy of `site`, or an out-of-bounds error.
    pub fn occupancy_at(&self, site: Site) -> Result<Occupancy, LatgasError> {
        let idx = self.index_of(site)?;
        Ok(self.cells[idx])
    }

    /// Flips the occupancy of `site` in place and returns the new value.
    pub fn toggle(&mut self, site: Site) -> Result<Occupancy, LatgasError> {
        let idx = self.index_of(site)?;
        let next = self.cells[idx].flipped();
        self.write(idx, next);
        Ok(next)
    }

    /// Overwrites the occupancy of `site`.
    pub fn set_occupancy(&mut self, site: Site, value: Occupancy) -> Result<(), LatgasError> {
        let idx = self.index_of(site)?;
        self.write(idx, value);
        Ok(())
    }

    /// Row-major view over all cells.
    pub fn cells(&self) -> &[Occupancy] {
        &self.cells
    }

    /// Iterates over every site in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = Site> + '_ {
        let width = self.width;
        (0..self.cells.len()).map(move |idx| Site::new(idx / width, idx % width))
    }

    /// Read-only view handed to renderers.
    pub fn snapshot(&self) -> LatticeSnapshot<'_> {
        LatticeSnapshot::new(self)
    }

    /// SHA-256 fingerprint over the dimensions and cell contents.
    pub fn canonical_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.width as u64).to_le_bytes());
        hasher.update((self.height as u64).to_le_bytes());
        let bytes: Vec<u8> = self.cells.iter().map(|cell| *cell as u8).collect();
        hasher.update(&bytes);
        format!("{:x}", hasher.finalize())
    }

    fn index_of(&self, site: Site) -> Result<usize, LatgasError> {
        if !self.contains(site) {
            return Err(LatgasError::OutOfBounds(
                ErrorInfo::new("site-out-of-bounds", "site lies outside the lattice")
                    .with_context("row", site.row.to_string())
                    .with_context("col", site.col.to_string())
                    .with_context("width", self.width.to_string())
                    .with_context("height", self.height.to_string()),
            ));
        }
        Ok(site.row * self.width + site.col)
    }

    fn write(&mut self, idx: usize, value: Occupancy) {
        let previous = std::mem::replace(&mut self.cells[idx], value);
        match (previous, value) {
            (Occupancy::Empty, Occupancy::Filled) => self.occupied += 1,
            (Occupancy::Filled, Occupancy::Empty) => self.occupied -= 1,
            _ => {}
        }
    }
}

fn cell_count(width: usize, height: usize) -> Result<usize, LatgasError> {
    width.checked_mul(height).ok_or_else(|| {
        LatgasError::Config(
            ErrorInfo::new("lattice-too-large", "lattice dimensions overflow")
                .with_context("width", width.to_string())
                .with_context("height", height.to_string()),
        )
    })
}
