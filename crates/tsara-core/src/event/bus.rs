//! Broadcast event bus for distributing `ConversationEvent` to observers.
//!
//! Built on `tokio::sync::broadcast`. Publishing with no active subscribers
//! is a no-op, so the controller can publish unconditionally.

use tokio::sync::broadcast;
use tsara_types::event::ConversationEvent;

/// Default channel capacity; a lagging renderer re-reads the snapshot.
pub const DEFAULT_CAPACITY: usize = 256;

/// Multi-consumer bus for conversation events.
///
/// Cloning the bus clones the sender, so every clone publishes into and
/// subscribes from the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ConversationEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ConversationEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
