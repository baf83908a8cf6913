use crate::actor::ActorId;
use crate::system::RuntimeInner;

use std::sync::Arc;
use tracing::debug;

/// Releases an actor's registration with its runtime when the behavior loop
/// task ends, however it ends.
///
/// Normal exit (mailbox closed by shutdown) calls `waive` first. If the task
/// is instead dropped mid-flight, e.g. because the host Tokio runtime is going
/// away, the guard still unregisters the mailbox and releases the actor wait
/// group so `Runtime::shutdown` cannot hang on it.
pub(crate) struct ActorDropGuard {
  runtime: Arc<RuntimeInner>,
  actor_id: ActorId,
  stopped_normally: bool,
}

impl ActorDropGuard {
  pub fn new(runtime: Arc<RuntimeInner>, actor_id: ActorId) -> Self {
    Self {
      runtime,
      actor_id,
      stopped_normally: false,
    }
  }

  pub fn waive(&mut self) {
    self.stopped_normally = true;
  }
}

impl Drop for ActorDropGuard {
  fn drop(&mut self) {
    if !self.stopped_normally {
      debug!(
        actor_id = self.actor_id,
        "ActorDropGuard: behavior loop dropped before its mailbox closed (task cancelled)."
      );
    }
    self.runtime.actor_stopped(self.actor_id);
  }
}
