use super::ActorContext;
use crate::message::Message;

use std::fmt;

type Handler = Box<dyn FnMut(&mut ActorContext, Message) + Send + 'static>;

/// How an actor handles one message.
///
/// A behavior is any `FnMut(&mut ActorContext, Message)`. It may own state
/// private to the actor; the executor never runs two invocations of the same
/// actor at once, so no locking is needed inside.
///
/// ```
/// use tinyactor::{ActorContext, Behavior, Message};
///
/// fn print(_ctx: &mut ActorContext, msg: Message) {
///   for index in 0..msg.len() {
///     if let Some(text) = msg.str_at(index) {
///       println!("{}", text);
///     }
///   }
/// }
///
/// let mut seen = 0usize;
/// let counting = Behavior::new(move |_ctx, _msg| seen += 1);
/// let printing: Behavior = print.into();
/// # drop((counting, printing));
/// ```
pub struct Behavior {
  handler: Handler,
}

impl Behavior {
  pub fn new<F>(handler: F) -> Self
  where
    F: FnMut(&mut ActorContext, Message) + Send + 'static,
  {
    Self {
      handler: Box::new(handler),
    }
  }

  /// A behavior that accepts and discards every message.
  ///
  /// Becoming this is how an actor stops reacting; its mailbox stays open.
  pub fn ignore() -> Self {
    Self::new(|_, _| {})
  }

  pub(crate) fn invoke(&mut self, ctx: &mut ActorContext, message: Message) {
    (self.handler)(ctx, message)
  }
}

impl<F> From<F> for Behavior
where
  F: FnMut(&mut ActorContext, Message) + Send + 'static,
{
  fn from(handler: F) -> Self {
    Behavior::new(handler)
  }
}

impl fmt::Debug for Behavior {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Behavior").finish_non_exhaustive()
  }
}
