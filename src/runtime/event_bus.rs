// src/runtime/event_bus.rs

use super::system_events::RuntimeEvent;
use tokio::sync::broadcast::{self, Receiver, Sender};

// Define a reasonable capacity for the bus
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

/// A self-contained event bus for broadcasting runtime trace events.
/// Internally uses tokio::sync::broadcast.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
  sender: Sender<RuntimeEvent>,
}

impl EventBus {
  /// Creates a new EventBus with specific capacity.
  pub fn with_capacity(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity.max(1)); // Ensure capacity >= 1
    tracing::debug!(capacity = capacity.max(1), "Created new EventBus with capacity");
    Self { sender }
  }

  /// Publishes an event onto the bus.
  ///
  /// Having no subscribers is normal (nobody is watching the trace), so the
  /// event is simply dropped. Returns how many receivers got it.
  pub fn publish(&self, event: RuntimeEvent) -> usize {
    tracing::trace!(event = event.variant_name(), "Publishing event");
    self.sender.send(event).unwrap_or(0)
  }

  /// Creates a new receiver handle to subscribe to events from the bus.
  ///
  /// Each receiver will see all events published *after* it subscribed.
  /// If a receiver lags, it might miss messages (see `tokio::sync::broadcast` docs).
  pub fn subscribe(&self) -> Receiver<RuntimeEvent> {
    tracing::trace!("Creating new event bus subscription");
    self.sender.subscribe()
  }

  /// Returns the number of active subscribers.
  pub fn subscriber_count(&self) -> usize {
    self.sender.receiver_count()
  }
}

impl Default for EventBus {
  fn default() -> Self {
    Self::with_capacity(DEFAULT_EVENT_BUS_CAPACITY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn publish_without_subscribers_is_dropped() {
    let bus = EventBus::default();
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(bus.publish(RuntimeEvent::Quiescent { first: true }), 0);
  }

  #[tokio::test]
  async fn subscribers_see_later_events_in_order() {
    let bus = EventBus::with_capacity(0);
    let mut rx = bus.subscribe();
    assert_eq!(bus.publish(RuntimeEvent::BehaviorReplaced { actor_id: 4 }), 1);
    assert_eq!(
      rx.recv().await.unwrap(),
      RuntimeEvent::BehaviorReplaced { actor_id: 4 }
    );
  }
}
