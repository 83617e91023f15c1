//! In-process snapshot bus backed by a tokio [`watch`] channel.
//!
//! The controller publishes an immutable copy of the system state at the
//! end of every tick (and after every manual mutation). Readers always see
//! the most recently published snapshot without contending for the tick's
//! critical section.

use haven_domain::state::SystemState;
use tokio::sync::watch;

/// Latest-value snapshot bus.
///
/// Publishing succeeds even when there are no active subscribers.
pub struct SnapshotBus {
    sender: watch::Sender<SystemState>,
}

impl SnapshotBus {
    /// Create a bus seeded with an initial snapshot.
    #[must_use]
    pub fn new(initial: SystemState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Publish a new snapshot, replacing the previous one.
    pub fn publish(&self, snapshot: SystemState) {
        // send_replace stores the value even with zero receivers, unlike
        // send, so a publish can never fail.
        self.sender.send_replace(snapshot);
    }

    /// Subscribe to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SystemState> {
        self.sender.subscribe()
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> SystemState {
        self.sender.borrow().clone()
    }
}

impl Default for SnapshotBus {
    fn default() -> Self {
        Self::new(SystemState::new())
    }
}
