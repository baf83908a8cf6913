use crate::actor::ActorId;

use std::time::Duration;

/// Delivery trace events broadcast on the runtime's `EventBus` when
/// `RuntimeConfig::trace` is enabled.
///
/// Publishing is pure observation: no event is ever awaited by the engine, and
/// a lagging or absent subscriber changes nothing about delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
  /// A new actor's behavior loop was spawned.
  ActorCreated {
    actor_id: ActorId,
    /// The actor whose behavior created this one, if any.
    parent_id: Option<ActorId>,
  },

  /// A message was accepted into a mailbox.
  Enqueued {
    actor_id: ActorId,
    /// Mailbox backlog right after the enqueue.
    depth: usize,
    /// Runtime-wide in-flight count including this message.
    in_flight: usize,
  },

  /// A send was refused because the runtime is shutting down.
  SendRejected { actor_id: ActorId },

  /// The behavior loop pulled a message and is about to invoke its behavior.
  Dequeued {
    actor_id: ActorId,
    /// Number of parameters in the message.
    params: usize,
    /// Time spent in the mailbox.
    queued_for: Duration,
  },

  /// A behavior invocation returned and the message was counted as processed.
  Delivered {
    actor_id: ActorId,
    /// Runtime-wide in-flight count after this message.
    in_flight: usize,
  },

  /// A pending `become` was installed; it handles the actor's next message.
  BehaviorReplaced { actor_id: ActorId },

  /// A behavior panicked. The message still counts as processed.
  BehaviorPanicked { actor_id: ActorId, reason: String },

  /// The in-flight counter reached zero.
  Quiescent {
    /// `true` for the crossing that fired the runtime's completion signal.
    first: bool,
  },

  /// An actor's behavior loop exited (runtime shutdown).
  ActorStopped { actor_id: ActorId },
}

impl RuntimeEvent {
  pub fn variant_name(&self) -> &'static str {
    match self {
      RuntimeEvent::ActorCreated { .. } => "ActorCreated",
      RuntimeEvent::Enqueued { .. } => "Enqueued",
      RuntimeEvent::SendRejected { .. } => "SendRejected",
      RuntimeEvent::Dequeued { .. } => "Dequeued",
      RuntimeEvent::Delivered { .. } => "Delivered",
      RuntimeEvent::BehaviorReplaced { .. } => "BehaviorReplaced",
      RuntimeEvent::BehaviorPanicked { .. } => "BehaviorPanicked",
      RuntimeEvent::Quiescent { .. } => "Quiescent",
      RuntimeEvent::ActorStopped { .. } => "ActorStopped",
    }
  }

  /// The actor this event is about, if it concerns a single actor.
  pub fn actor_id(&self) -> Option<ActorId> {
    match self {
      RuntimeEvent::ActorCreated { actor_id, .. }
      | RuntimeEvent::Enqueued { actor_id, .. }
      | RuntimeEvent::SendRejected { actor_id }
      | RuntimeEvent::Dequeued { actor_id, .. }
      | RuntimeEvent::Delivered { actor_id, .. }
      | RuntimeEvent::BehaviorReplaced { actor_id }
      | RuntimeEvent::BehaviorPanicked { actor_id, .. }
      | RuntimeEvent::ActorStopped { actor_id } => Some(*actor_id),
      RuntimeEvent::Quiescent { .. } => None,
    }
  }
}
