use serde::{Deserialize, Serialize};

use crate::kernel::StepOutcome;

/// Running tallies of step outcomes since the last regeneration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatistics {
    /// Steps executed, including same-type no-ops.
    pub attempts: u64,
    /// Steps that drew two sites with the same occupancy.
    pub same_type: u64,
    /// Evaluated swaps that were rejected.
    pub rejected: u64,
    /// Evaluated swaps that were committed.
    pub accepted: u64,
}

impl StepStatistics {
    /// Folds one step outcome into the tallies.
    pub fn record(&mut self, outcome: &StepOutcome) {
        self.attempts += 1;
        match outcome {
            StepOutcome::SameType => self.same_type += 1,
            StepOutcome::Rejected(_) => self.rejected += 1,
            StepOutcome::Accepted(_) => self.accepted += 1,
        }
    }

    /// Swaps that reached the acceptance test.
    pub fn proposals(&self) -> u64 {
        self.accepted + self.rejected
    }

    /// Fraction of evaluated swaps that were committed (0 when none were).
    pub fn acceptance_rate(&self) -> f64 {
        let proposals = self.proposals();
        if proposals == 0 {
            0.0
        } else {
            self.accepted as f64 / proposals as f64
        }
    }
}
