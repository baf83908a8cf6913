use super::ActorId;
use crate::message::Message;
use crate::runtime::{Envelope, MailboxSender, RuntimeEvent};
use crate::system::RuntimeInner;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A capability to send messages to one actor.
///
/// Cheap to clone, `Send + Sync`, and may itself be carried inside a
/// [`Message`] so actors can reply to each other. A handle stays valid for the
/// lifetime of its runtime; `become` never invalidates it.
#[derive(Clone)]
pub struct ActorRef {
  id: ActorId,
  mailbox: MailboxSender,
  runtime: Arc<RuntimeInner>,
}

impl ActorRef {
  pub(crate) fn new(id: ActorId, mailbox: MailboxSender, runtime: Arc<RuntimeInner>) -> Self {
    Self { id, mailbox, runtime }
  }

  /// Runtime-unique id of the actor, as used in logs and trace events.
  pub fn id(&self) -> ActorId {
    self.id
  }

  /// Enqueues `message` for the actor. Never blocks.
  ///
  /// The message is counted as in flight before it becomes visible to the
  /// actor, so the runtime cannot look idle while it sits in the mailbox.
  /// After the runtime has shut down the message is discarded (and logged)
  /// instead, without touching the in-flight count.
  pub fn send(&self, message: Message) {
    // Closed mailboxes must not arm the in-flight counter.
    if self.mailbox.is_closed() {
      self.discard(message);
      return;
    }
    let in_flight = self.runtime.in_flight().accept();

    match self.mailbox.try_send(Envelope::new(message)) {
      Ok(()) => {
        let depth = self.mailbox.len();
        tracing::trace!(actor_id = self.id, depth, in_flight, "Message enqueued");
        self.runtime.check_mailbox_depth(self.id, depth);
        self.runtime.trace(|| RuntimeEvent::Enqueued {
          actor_id: self.id,
          depth,
          in_flight,
        });
      }
      Err(rejected) => {
        // Closed between the check above and the enqueue.
        self.runtime.in_flight().retract();
        self.discard(rejected.into_inner().message);
      }
    }
  }

  fn discard(&self, message: Message) {
    tracing::warn!(
      actor_id = self.id,
      ?message,
      "Discarding message sent after runtime shutdown"
    );
    self.runtime.trace(|| RuntimeEvent::SendRejected { actor_id: self.id });
  }

  /// Messages waiting in the mailbox, not counting one being processed.
  pub fn mailbox_len(&self) -> usize {
    self.mailbox.len()
  }

  /// `true` once the owning runtime has shut down.
  pub fn is_closed(&self) -> bool {
    self.mailbox.is_closed()
  }

  pub(crate) fn runtime(&self) -> &Arc<RuntimeInner> {
    &self.runtime
  }
}

impl PartialEq for ActorRef {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id && Arc::ptr_eq(&self.runtime, &other.runtime)
  }
}

impl Eq for ActorRef {}

impl Hash for ActorRef {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for ActorRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ActorRef")
      .field("id", &self.id)
      .field("mailbox_len", &self.mailbox.len())
      .finish()
  }
}
