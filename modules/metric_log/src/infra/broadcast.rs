use tokio::sync::broadcast;

use crate::domain::ports::EventPublisher;

/// Typed fan-out built on `tokio::sync::broadcast`.
/// - T must be `Clone` so every subscriber receives its own copy.
/// - The channel is bounded; a lagging subscriber loses the oldest events
///   and sees `RecvError::Lagged` once.
#[derive(Clone)]
pub struct BroadcastPublisher<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> BroadcastPublisher<T> {
    /// Create a publisher buffering at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> EventPublisher<T> for BroadcastPublisher<T> {
    fn publish(&self, event: &T) {
        // No subscribers is not an error.
        let _ = self.tx.send(event.clone());
    }
}
