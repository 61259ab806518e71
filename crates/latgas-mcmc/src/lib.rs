#![deny(missing_docs)]

//! Kawasaki-exchange Metropolis sampler and interactive controller for the
//! latgas lattice gas.

/// Cancellable repeating deadline driving automatic steps.
pub mod cadence;
/// Simulation parameters, defaults and validation.
pub mod config;
/// Run/pause state machine owning the lattice.
pub mod controller;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Nearest-neighbour energy model.
pub mod energy;
/// Metropolis step engine.
pub mod kernel;
/// Redraw notifications for presentation layers.
pub mod listener;
/// Step outcome tallies.
pub mod metrics;
/// Pointer-to-site mapping for manual edits.
pub mod pointer;

pub use cadence::{Cadence, CadenceToken};
pub use config::{SeedPolicy, SimulationParameters};
pub use controller::{RunState, SimulationController};
pub use energy::{filled_neighbor_count, local_energy};
pub use kernel::{
    acceptance_probability, metropolis_step, swap_acceptance_probability, Coupling, StepOutcome,
    SwapProposal,
};
pub use listener::{ChannelListener, NoopListener, RedrawEvent, RedrawListener, RedrawReason};
pub use metrics::StepStatistics;
