use std::time::{Duration, Instant};

/// Handle identifying one armed cadence.
///
/// Hosts that drive stepping from their own timer keep the token and hand it
/// back on every fire. Cancelling or re-arming the cadence makes every
/// previously issued token stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CadenceToken {
    generation: u64,
}

/// Cancellable repeating deadline for automatic steps.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    next_due: Option<Instant>,
    generation: u64,
}

impl Cadence {
    /// Creates an idle cadence with the given period.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            generation: 0,
        }
    }

    /// Current period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the period. An already scheduled deadline is left alone; the
    /// new period applies from the next reschedule.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a deadline is scheduled.
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Next scheduled deadline, if armed.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Token for the currently armed cadence.
    pub fn token(&self) -> Option<CadenceToken> {
        self.next_due.map(|_| CadenceToken {
            generation: self.generation,
        })
    }

    /// Whether `token` belongs to the currently armed cadence.
    pub fn is_current(&self, token: CadenceToken) -> bool {
        self.next_due.is_some() && token.generation == self.generation
    }

    /// Arms the cadence with its first deadline one period after `now`.
    pub fn arm(&mut self, now: Instant) -> CadenceToken {
        self.cancel();
        self.next_due = Some(now + self.interval);
        CadenceToken {
            generation: self.generation,
        }
    }

    /// Drops any pending deadline and invalidates outstanding tokens.
    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        self.next_due.take().is_some()
    }

    /// Whether the pending deadline has passed at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(due) if due <= now)
    }

    /// Moves the pending deadline forward by one current period.
    pub fn advance(&mut self) {
        if let Some(due) = self.next_due {
            self.next_due = Some(due + self.interval);
        }
    }

    /// Re-anchors the pending deadline one period after `now`.
    pub fn reanchor(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
    }
}
