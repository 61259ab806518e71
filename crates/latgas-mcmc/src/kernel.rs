use latgas_core::errors::ErrorInfo;
use latgas_core::{Lattice, LatgasError, Occupancy, Site};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{validate_interaction_energy, validate_temperature};
use crate::energy::{are_adjacent, filled_neighbor_count, local_energy};

/// Interaction energy and temperature read for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coupling {
    interaction_energy: f64,
    temperature: f64,
}

impl Coupling {
    /// Validates and bundles `E` and `T`.
    pub fn new(interaction_energy: f64, temperature: f64) -> Result<Self, LatgasError> {
        validate_interaction_energy(interaction_energy)?;
        validate_temperature(temperature)?;
        Ok(Self {
            interaction_energy,
            temperature,
        })
    }

    /// Nearest-neighbour interaction energy `E`.
    pub fn interaction_energy(&self) -> f64 {
        self.interaction_energy
    }

    /// Temperature `T`.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

/// Particle/vacancy exchange evaluated by the kernel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SwapProposal {
    /// Filled site whose particle would move.
    pub mover: Site,
    /// Empty site the particle would move into.
    pub target: Site,
    /// Filled neighbours of the mover at its current site.
    pub mover_neighbors: u8,
    /// Filled neighbours the particle would have at the target, excluding itself.
    pub target_neighbors: u8,
    /// `E1`: energy of the mover where it stands.
    pub mover_energy: f64,
    /// `E2`: energy the mover would have at the target.
    pub target_energy: f64,
    /// Acceptance probability `sigmoid((E1 - E2) / T)`.
    pub acceptance_prob: f64,
    /// Uniform draw in `[0, 1)` compared against `acceptance_prob`.
    pub draw: f64,
}

/// Result of a single Metropolis step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum StepOutcome {
    /// Both drawn sites had the same occupancy; nothing was evaluated.
    SameType,
    /// The swap was evaluated and rejected.
    Rejected(SwapProposal),
    /// The swap was evaluated and committed.
    Accepted(SwapProposal),
}

impl StepOutcome {
    /// The evaluated proposal, if the step got that far.
    pub fn proposal(&self) -> Option<&SwapProposal> {
        match self {
            StepOutcome::SameType => None,
            StepOutcome::Rejected(proposal) | StepOutcome::Accepted(proposal) => Some(proposal),
        }
    }

    /// Whether the lattice changed.
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted(_))
    }
}

/// Logistic acceptance probability for moving from energy `e1` to `e2`.
///
/// Equal to `q / (1 + q)` with `q = exp((e1 - e2) / T)`, evaluated so that
/// large energy gaps saturate to 0 or 1 instead of overflowing.
pub fn acceptance_probability(e1: f64, e2: f64, temperature: f64) -> f64 {
    logistic((e1 - e2) / temperature)
}

/// Acceptance probability of a move from `mover_neighbors` to
/// `target_neighbors` filled neighbours.
///
/// The exponent is built from the integer neighbour difference, so it stays
/// defined when `count * E` overflows to infinity.
pub fn swap_acceptance_probability(
    mover_neighbors: u8,
    target_neighbors: u8,
    coupling: Coupling,
) -> f64 {
    let delta = i16::from(mover_neighbors) - i16::from(target_neighbors);
    logistic(f64::from(delta) * coupling.interaction_energy / coupling.temperature)
}

fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let q = x.exp();
        q / (1.0 + q)
    }
}

/// Evaluates the swap of the particle at `mover` into the vacancy at `target`.
///
/// Does not mutate the lattice; `draw` is filled in by the caller.
pub fn evaluate_swap(
    lattice: &Lattice,
    mover: Site,
    target: Site,
    coupling: Coupling,
) -> Result<SwapProposal, LatgasError> {
    if !lattice.occupancy_at(mover)?.is_filled() || lattice.occupancy_at(target)?.is_filled() {
        return Err(LatgasError::State(
            ErrorInfo::new("invalid-swap", "swap needs a filled mover and an empty target")
                .with_context("mover", format!("({}, {})", mover.row, mover.col))
                .with_context("target", format!("({}, {})", target.row, target.col)),
        ));
    }
    let mover_neighbors = filled_neighbor_count(lattice, mover)?;
    let mut target_neighbors = filled_neighbor_count(lattice, target)?;
    if are_adjacent(mover, target) {
        // The mover was counted as a neighbour of the target it is about to vacate.
        target_neighbors = target_neighbors.saturating_sub(1);
    }
    let mover_energy = local_energy(mover_neighbors, coupling.interaction_energy);
    let target_energy = local_energy(target_neighbors, coupling.interaction_energy);
    Ok(SwapProposal {
        mover,
        target,
        mover_neighbors,
        target_neighbors,
        mover_energy,
        target_energy,
        acceptance_prob: swap_acceptance_probability(mover_neighbors, target_neighbors, coupling),
        draw: 0.0,
    })
}

/// Performs one Kawasaki exchange step on `lattice`.
///
/// Two sites are drawn uniformly with replacement. A same-occupancy pair ends
/// the step without further draws; otherwise the swap is evaluated and
/// committed when a uniform draw `u` satisfies `u <= p`.
pub fn metropolis_step<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    coupling: Coupling,
    rng: &mut R,
) -> Result<StepOutcome, LatgasError> {
    if lattice.is_empty() {
        return Ok(StepOutcome::SameType);
    }
    let first = Site::new(
        rng.gen_range(0..lattice.height()),
        rng.gen_range(0..lattice.width()),
    );
    let second = Site::new(
        rng.gen_range(0..lattice.height()),
        rng.gen_range(0..lattice.width()),
    );
    let first_state = lattice.occupancy_at(first)?;
    if first_state == lattice.occupancy_at(second)? {
        return Ok(StepOutcome::SameType);
    }
    let (mover, target) = if first_state.is_filled() {
        (first, second)
    } else {
        (second, first)
    };

    let mut proposal = evaluate_swap(lattice, mover, target, coupling)?;
    proposal.draw = rng.gen::<f64>();
    trace!(
        mover = ?proposal.mover,
        target = ?proposal.target,
        e1 = proposal.mover_energy,
        e2 = proposal.target_energy,
        p = proposal.acceptance_prob,
        "evaluated swap"
    );
    if proposal.draw <= proposal.acceptance_prob {
        lattice.set_occupancy(mover, Occupancy::Empty)?;
        lattice.set_occupancy(target, Occupancy::Filled)?;
        Ok(StepOutcome::Accepted(proposal))
    } else {
        Ok(StepOutcome::Rejected(proposal))
    }
}
