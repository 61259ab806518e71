//! Read-only lattice view for presentation layers.

use serde::Serialize;

use crate::errors::LatgasError;
use crate::lattice::{Lattice, Occupancy, Site};

/// Borrowed view of a [`Lattice`] that renderers consume.
///
/// The view cannot mutate the lattice; it is valid for as long as the
/// controller is not borrowed mutably.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LatticeSnapshot<'a> {
    #[serde(flatten)]
    lattice: &'a Lattice,
}

impl<'a> LatticeSnapshot<'a> {
    pub(crate) fn new(lattice: &'a Lattice) -> Self {
        Self { lattice }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.lattice.width()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.lattice.height()
    }

    /// Number of filled sites.
    pub fn occupied_count(&self) -> usize {
        self.lattice.occupied_count()
    }

    /// Occupancy at `(row, col)`, or an out-of-bounds error.
    pub fn occupancy_at(&self, row: usize, col: usize) -> Result<Occupancy, LatgasError> {
        self.lattice.occupancy_at(Site::new(row, col))
    }

    /// Iterates over rows, each a slice of `width` cells.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Occupancy]> + 'a {
        let lattice = self.lattice;
        lattice.cells().chunks(lattice.width().max(1))
    }

    /// Fingerprint of the viewed lattice.
    pub fn canonical_hash(&self) -> String {
        self.lattice.canonical_hash()
    }
}
