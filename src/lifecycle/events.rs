//! Control events inside a running node.

use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// The operator asked for an in-place configuration reload.
    Reload,
    /// The process is about to stop.
    Shutdown,
}

/// Fan-out of control events.
///
/// Long-running tasks subscribe and react; the signal listener publishes.
#[derive(Debug, Clone)]
pub struct ControlEvents {
    /// Broadcast channel sender.
    tx: broadcast::Sender<ControlEvent>,
}

impl ControlEvents {
    /// Create a coordinator with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ControlEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Returns how many subscribers will see it.
    pub fn publish(&self, event: ControlEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Get the number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ControlEvents {
    fn default() -> Self {
        Self::new()
    }
}
