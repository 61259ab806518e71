use std::sync::mpsc::Sender;

use latgas_core::{Occupancy, Site};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What changed since the previous redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedrawReason {
    /// A fresh lattice replaced the previous one.
    Regenerated,
    /// An automatic step moved a particle.
    Swap {
        /// Site the particle left.
        from: Site,
        /// Site the particle entered.
        to: Site,
    },
    /// A manual edit flipped one site.
    Toggle {
        /// Edited site.
        site: Site,
        /// Occupancy after the edit.
        now: Occupancy,
    },
    /// Only cosmetic parameters changed.
    Appearance,
}

/// Notification sent to the presentation layer after every visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedrawEvent {
    /// Cause of the redraw.
    pub reason: RedrawReason,
    /// Step counter after the change.
    pub step_count: u64,
    /// Occupied-site count after the change.
    pub occupied_count: usize,
}

/// Receiver of redraw notifications.
///
/// Implementations must return promptly: the controller calls them inline
/// and the next step waits for the call to return.
pub trait RedrawListener {
    /// Handles one redraw notification.
    fn on_redraw(&mut self, event: RedrawEvent);
}

impl<F> RedrawListener for F
where
    F: FnMut(RedrawEvent),
{
    fn on_redraw(&mut self, event: RedrawEvent) {
        self(event)
    }
}

/// Listener that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl RedrawListener for NoopListener {
    fn on_redraw(&mut self, _event: RedrawEvent) {}
}

/// Forwards notifications over a channel to a renderer on another thread.
///
/// Sending never blocks; a disconnected receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<RedrawEvent>,
}

impl ChannelListener {
    /// Wraps the sending half of a channel.
    pub fn new(sender: Sender<RedrawEvent>) -> Self {
        Self { sender }
    }
}

impl RedrawListener for ChannelListener {
    fn on_redraw(&mut self, event: RedrawEvent) {
        if self.sender.send(event).is_err() {
            trace!("redraw receiver disconnected");
        }
    }
}
