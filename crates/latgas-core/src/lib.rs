#![deny(missing_docs)]
#![doc = "Core lattice state, error and RNG types for the latgas lattice-gas engine."]

pub mod errors;
pub mod lattice;
pub mod rng;
pub mod snapshot;

pub use errors::{ErrorInfo, LatgasError};
pub use lattice::{Lattice, Occupancy, Site};
pub use rng::{derive_substream_seed, RngHandle, LATTICE_SUBSTREAM, STEP_SUBSTREAM};
pub use snapshot::LatticeSnapshot;
