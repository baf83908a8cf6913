// src/runtime/mailbox.rs

//! Type aliases for actor mailboxes based on `async-channel`.

use crate::message::Message;

use std::time::{Duration, Instant};

/// What actually travels through a mailbox: the message plus when it was accepted.
#[derive(Debug)]
pub(crate) struct Envelope {
  pub message: Message,
  pub enqueued_at: Instant,
}

impl Envelope {
  pub fn new(message: Message) -> Self {
    Self {
      message,
      enqueued_at: Instant::now(),
    }
  }

  /// How long the message sat in the mailbox before being pulled.
  pub fn queued_for(&self) -> Duration {
    self.enqueued_at.elapsed()
  }
}

/// The sending end of an actor's mailbox.
/// It is cloneable, and every `ActorRef` for the actor holds one.
pub(crate) type MailboxSender = async_channel::Sender<Envelope>;

/// The receiving end of an actor's mailbox.
/// Only the actor's behavior loop owns and receives from it.
pub(crate) type MailboxReceiver = async_channel::Receiver<Envelope>;

/// Creates a new mailbox channel pair.
///
/// Mailboxes are unbounded: `ActorRef::send` is called from inside synchronous
/// behaviors, and a bounded mailbox would deadlock an actor that sends to
/// itself once full. `RuntimeConfig::mailbox_depth_warning` reports backlogs
/// instead of applying backpressure.
pub(crate) fn mailbox() -> (MailboxSender, MailboxReceiver) {
  async_channel::unbounded()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn delivers_in_send_order() {
    let (tx, rx) = mailbox();
    for i in 0..5u32 {
      tx.try_send(Envelope::new(crate::message![i])).unwrap();
    }
    assert_eq!(tx.len(), 5);
    for i in 0..5u32 {
      let envelope = rx.recv().await.unwrap();
      assert_eq!(envelope.message.get::<u32>(0), Some(&i));
    }
    assert!(rx.is_empty());
  }

  #[tokio::test]
  async fn closed_mailbox_drains_then_ends() {
    let (tx, rx) = mailbox();
    tx.try_send(Envelope::new(crate::message!["last"])).unwrap();
    tx.close();

    assert!(tx.try_send(Envelope::new(crate::message!["late"])).is_err());
    let envelope = rx.recv().await.unwrap();
    assert_eq!(envelope.message.str_at(0), Some("last"));
    assert!(rx.recv().await.is_err());
  }
}
