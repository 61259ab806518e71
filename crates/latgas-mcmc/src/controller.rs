use std::time::{Duration, Instant};

use latgas_core::errors::ErrorInfo;
use latgas_core::{Lattice, LatgasError, LatticeSnapshot, Occupancy, RngHandle, Site};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::cadence::{Cadence, CadenceToken};
use crate::config::{
    validate_dimensions, validate_interaction_energy, validate_step_interval,
    validate_temperature, SimulationParameters,
};
use crate::determinism;
use crate::kernel::{self, Coupling, StepOutcome};
use crate::listener::{NoopListener, RedrawEvent, RedrawListener, RedrawReason};
use crate::metrics::StepStatistics;

/// Whether automatic stepping is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// No automatic steps are scheduled.
    Idle,
    /// Steps fire on the cadence until paused.
    Running,
}

/// Owns the lattice and drives it through the Metropolis kernel.
///
/// All mutation goes through `&mut self`: automatic steps from [`poll`] or
/// [`fire`], and manual edits from [`manual_toggle`]. Stepping is cooperative;
/// the host calls [`poll`] from its event loop (or [`fire`] from its own timer)
/// and the controller runs whichever ticks are due.
///
/// [`poll`]: SimulationController::poll
/// [`fire`]: SimulationController::fire
/// [`manual_toggle`]: SimulationController::manual_toggle
pub struct SimulationController<L: RedrawListener = NoopListener> {
    params: SimulationParameters,
    lattice: Lattice,
    state: RunState,
    cadence: Cadence,
    step_rng: RngHandle,
    step_count: u64,
    statistics: StepStatistics,
    generation: u64,
    listener: L,
}

impl SimulationController<NoopListener> {
    /// Builds a controller without a presentation layer.
    pub fn headless(params: SimulationParameters) -> Result<Self, LatgasError> {
        Self::new(params, NoopListener)
    }
}

impl<L: RedrawListener> SimulationController<L> {
    /// Validates `params` and generates the first lattice. The controller
    /// starts Idle.
    pub fn new(params: SimulationParameters, listener: L) -> Result<Self, LatgasError> {
        params.validate()?;
        let master_seed = params.seed_policy.master_seed;
        let lattice = build_lattice(&params, 0)?;
        let cadence = Cadence::new(Duration::from_millis(params.step_interval_ms));
        info!(
            width = params.width,
            height = params.height,
            occupied = lattice.occupied_count(),
            seed = master_seed,
            label = params.seed_policy.label.as_deref().unwrap_or(""),
            "simulation created"
        );
        Ok(Self {
            step_rng: RngHandle::from_seed(determinism::step_seed(master_seed, 0)),
            params,
            lattice,
            state: RunState::Idle,
            cadence,
            step_count: 0,
            statistics: StepStatistics::default(),
            generation: 0,
            listener,
        })
    }

    /// Replaces the parameters and regenerates the lattice from scratch.
    ///
    /// Invalid parameters are rejected before anything changes.
    pub fn configure(&mut self, params: SimulationParameters) -> Result<(), LatgasError> {
        params.validate()?;
        self.params = params;
        self.cadence
            .set_interval(Duration::from_millis(self.params.step_interval_ms));
        self.regenerate()
    }

    /// Stops any cadence and builds a fresh lattice from the held parameters.
    ///
    /// Resets the step counter and statistics; the occupied count becomes the
    /// realised initial fill.
    pub fn regenerate(&mut self) -> Result<(), LatgasError> {
        self.cadence.cancel();
        self.state = RunState::Idle;

        let generation = self.generation + 1;
        let lattice = build_lattice(&self.params, generation)?;
        self.generation = generation;
        self.lattice = lattice;
        self.step_rng = RngHandle::from_seed(determinism::step_seed(
            self.params.seed_policy.master_seed,
            generation,
        ));
        self.step_count = 0;
        self.statistics = StepStatistics::default();
        info!(
            generation,
            width = self.lattice.width(),
            height = self.lattice.height(),
            requested = self.params.initial_filled_count,
            occupied = self.lattice.occupied_count(),
            "lattice regenerated"
        );
        self.notify(RedrawReason::Regenerated);
        Ok(())
    }

    /// Begins automatic stepping; the first tick is due one interval after
    /// `now`. Valid only while Idle.
    pub fn start(&mut self, now: Instant) -> Result<CadenceToken, LatgasError> {
        if self.state == RunState::Running {
            return Err(LatgasError::State(ErrorInfo::new(
                "already-running",
                "start requires the simulation to be idle",
            )));
        }
        let token = self.cadence.arm(now);
        self.state = RunState::Running;
        info!(interval_ms = self.params.step_interval_ms, "simulation started");
        Ok(token)
    }

    /// Halts automatic stepping. Valid only while Running.
    pub fn pause(&mut self) -> Result<(), LatgasError> {
        if self.state != RunState::Running {
            return Err(LatgasError::State(ErrorInfo::new(
                "not-running",
                "pause requires the simulation to be running",
            )));
        }
        self.cadence.cancel();
        self.state = RunState::Idle;
        info!(steps = self.step_count, "simulation paused");
        Ok(())
    }

    /// Runs every tick due at `now` and returns how many ran.
    ///
    /// At most `max_catch_up` ticks run per call; when the schedule is still
    /// behind afterwards it is re-anchored one interval after `now` instead of
    /// replaying the backlog.
    pub fn poll(&mut self, now: Instant) -> Result<usize, LatgasError> {
        if self.state != RunState::Running {
            return Ok(0);
        }
        let mut fired = 0;
        while fired < self.params.max_catch_up && self.cadence.is_due(now) {
            self.tick()?;
            self.cadence.advance();
            fired += 1;
        }
        if self.cadence.is_due(now) {
            debug!(fired, "cadence fell behind, re-anchoring");
            self.cadence.reanchor(now);
        }
        Ok(fired)
    }

    /// Runs one tick for a host-owned timer holding `token` and returns its
    /// outcome.
    ///
    /// Returns `None` without stepping when the token is stale, which is the
    /// case after any pause or regenerate.
    pub fn fire(&mut self, token: CadenceToken) -> Result<Option<StepOutcome>, LatgasError> {
        if self.state != RunState::Running || !self.cadence.is_current(token) {
            trace!("ignored stale cadence token");
            return Ok(None);
        }
        self.tick().map(Some)
    }

    /// Flips `site`, adjusting the occupied count by one. Allowed in either
    /// run state; the step counter is untouched.
    pub fn manual_toggle(&mut self, site: Site) -> Result<Occupancy, LatgasError> {
        let now = self.lattice.toggle(site)?;
        debug!(row = site.row, col = site.col, ?now, "manual toggle");
        self.notify(RedrawReason::Toggle { site, now });
        Ok(now)
    }

    /// Sets `E`; the next step reads the new value.
    pub fn set_interaction_energy(&mut self, interaction_energy: f64) -> Result<(), LatgasError> {
        validate_interaction_energy(interaction_energy)?;
        self.params.interaction_energy = interaction_energy;
        debug!(interaction_energy, "interaction energy updated");
        Ok(())
    }

    /// Sets `T`; the next step reads the new value.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), LatgasError> {
        validate_temperature(temperature)?;
        self.params.temperature = temperature;
        debug!(temperature, "temperature updated");
        Ok(())
    }

    /// Sets the step interval. An already scheduled tick keeps its deadline;
    /// the new interval applies from the following one.
    pub fn set_step_interval(&mut self, step_interval_ms: u64) -> Result<(), LatgasError> {
        validate_step_interval(step_interval_ms)?;
        self.params.step_interval_ms = step_interval_ms;
        self.cadence
            .set_interval(Duration::from_millis(step_interval_ms));
        debug!(step_interval_ms, "step interval updated");
        Ok(())
    }

    /// Sets the renderer colours and requests a redraw.
    pub fn set_colors(&mut self, filled: impl Into<String>, empty: impl Into<String>) {
        self.params.filled_color = filled.into();
        self.params.empty_color = empty.into();
        self.notify(RedrawReason::Appearance);
    }

    /// Stores new dimensions for the next regenerate; the live lattice keeps
    /// its size.
    pub fn set_dimensions(&mut self, width: usize, height: usize) -> Result<(), LatgasError> {
        validate_dimensions(width, height)?;
        self.params.width = width;
        self.params.height = height;
        Ok(())
    }

    /// Stores the fill request for the next regenerate.
    pub fn set_initial_filled_count(&mut self, initial_filled_count: usize) {
        self.params.initial_filled_count = initial_filled_count;
    }

    /// Read-only view of the lattice for rendering.
    pub fn snapshot(&self) -> LatticeSnapshot<'_> {
        self.lattice.snapshot()
    }

    /// Evaluated swaps since the last regenerate (accepted or rejected).
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Filled sites on the live lattice.
    pub fn occupied_count(&self) -> usize {
        self.lattice.occupied_count()
    }

    /// Current run state.
    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// Whether the cadence is active.
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Parameters currently held, including values pending the next
    /// regenerate.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Outcome tallies since the last regenerate.
    pub fn statistics(&self) -> StepStatistics {
        self.statistics
    }

    /// Token for the active cadence, for hosts that own the timer.
    pub fn cadence_token(&self) -> Option<CadenceToken> {
        self.cadence.token()
    }

    /// Deadline of the next automatic tick, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.cadence.next_due()
    }

    /// The redraw listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the redraw listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    fn tick(&mut self) -> Result<StepOutcome, LatgasError> {
        let coupling = Coupling::new(self.params.interaction_energy, self.params.temperature)?;
        let outcome = kernel::metropolis_step(&mut self.lattice, coupling, &mut self.step_rng)?;
        self.statistics.record(&outcome);
        if let Some(proposal) = outcome.proposal() {
            self.step_count += 1;
            if outcome.is_accepted() {
                self.notify(RedrawReason::Swap {
                    from: proposal.mover,
                    to: proposal.target,
                });
            }
        }
        Ok(outcome)
    }

    fn notify(&mut self, reason: RedrawReason) {
        let event = RedrawEvent {
            reason,
            step_count: self.step_count,
            occupied_count: self.lattice.occupied_count(),
        };
        self.listener.on_redraw(event);
    }
}

impl<L: RedrawListener> Drop for SimulationController<L> {
    fn drop(&mut self) {
        if self.cadence.cancel() {
            debug!(steps = self.step_count, "cadence cancelled on teardown");
        }
    }
}

impl<L: RedrawListener> std::fmt::Debug for SimulationController<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationController")
            .field("state", &self.state)
            .field("width", &self.lattice.width())
            .field("height", &self.lattice.height())
            .field("occupied", &self.lattice.occupied_count())
            .field("step_count", &self.step_count)
            .finish_non_exhaustive()
    }
}

fn build_lattice(params: &SimulationParameters, generation: u64) -> Result<Lattice, LatgasError> {
    let requested = params.initial_filled_count;
    if requested > params.capacity() {
        debug!(
            requested,
            capacity = params.capacity(),
            "initial fill clamped to lattice capacity"
        );
    }
    let mut rng = RngHandle::from_seed(determinism::lattice_seed(
        params.seed_policy.master_seed,
        generation,
    ));
    Lattice::random(params.width, params.height, requested, &mut rng)
}
