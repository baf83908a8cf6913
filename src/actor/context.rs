use super::{ActorRef, Behavior};
use crate::system::Runtime;

/// What a behavior can do besides computing: learn its own handle, create
/// actors in the same runtime, and `become` a different behavior.
///
/// One context lives as long as its actor; the executor hands it to every
/// invocation.
#[derive(Debug)]
pub struct ActorContext {
  myself: ActorRef,
  // Pending replacement; taken by the executor after the invocation returns.
  next_behavior: Option<Behavior>,
}

impl ActorContext {
  pub(crate) fn new(myself: ActorRef) -> Self {
    Self {
      myself,
      next_behavior: None,
    }
  }

  /// This actor's own handle, e.g. to pass along as a reply address.
  pub fn myself(&self) -> &ActorRef {
    &self.myself
  }

  /// Replaces this actor's behavior starting with its next message.
  ///
  /// The current invocation keeps running unchanged. Only the first call per
  /// invocation counts; later calls before returning are ignored.
  /// Messages already queued, including ones this invocation sends to itself,
  /// go to the new behavior.
  pub fn become_behavior(&mut self, next: impl Into<Behavior>) {
    if self.next_behavior.is_some() {
      tracing::trace!(
        actor_id = self.myself.id(),
        "Ignoring repeated become within one invocation"
      );
      return;
    }
    self.next_behavior = Some(next.into());
  }

  /// Whether `become_behavior` has been called during this invocation.
  pub fn has_pending_become(&self) -> bool {
    self.next_behavior.is_some()
  }

  /// Creates a new actor in the same runtime as this one.
  pub fn create(&self, behavior: impl Into<Behavior>) -> ActorRef {
    self
      .myself
      .runtime()
      .spawn_actor(behavior.into(), Some(self.myself.id()))
  }

  /// A handle to the runtime this actor belongs to.
  ///
  /// Holding it does not keep the runtime alive; once the caller's last
  /// handle is dropped the runtime shuts down regardless.
  pub fn runtime(&self) -> Runtime {
    Runtime::from_inner(self.myself.runtime().clone())
  }

  pub(crate) fn take_next_behavior(&mut self) -> Option<Behavior> {
    self.next_behavior.take()
  }
}
