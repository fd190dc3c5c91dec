// Event fan-out for external indexers
use tokio::sync::broadcast;

use crate::primitives::SignalingEvent;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Broadcast bus for deployment events. Emission never fails a state
/// transition; subscribers that fall behind observe a lagged receiver.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SignalingEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SignalingEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: SignalingEvent) {
        // Send only errors when no subscriber is attached, which is fine
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}
