// src/actor/executor.rs

use super::{ActorContext, Behavior};
use crate::runtime::{ActorDropGuard, MailboxReceiver, RuntimeEvent};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

// Back-to-back deliveries before the loop yields to the scheduler.
const DELIVERIES_PER_YIELD: u64 = 64;

/// The behavior loop of one actor.
///
/// Pulls one message at a time, invokes the active behavior, installs a pending
/// `become`, and only then counts the message as processed. Runs until the
/// mailbox is closed and drained (runtime shutdown).
pub(crate) async fn run_behavior_loop(
  mut ctx: ActorContext,
  mut behavior: Behavior,
  mailbox: MailboxReceiver,
  mut drop_guard: ActorDropGuard,
) {
  let actor_id = ctx.myself().id();
  let runtime = ctx.myself().runtime().clone();
  let mut delivered: u64 = 0;

  tracing::debug!(actor_id, "Actor behavior loop starting.");

  while let Ok(envelope) = mailbox.recv().await {
    let queued_for = envelope.queued_for();
    let message = envelope.message;
    tracing::trace!(actor_id, ?message, ?queued_for, "Message dequeued");
    runtime.trace(|| RuntimeEvent::Dequeued {
      actor_id,
      params: message.len(),
      queued_for,
    });

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| behavior.invoke(&mut ctx, message)));

    match outcome {
      Ok(()) => {
        if let Some(next) = ctx.take_next_behavior() {
          behavior = next;
          tracing::debug!(actor_id, "Behavior replaced; effective from the next message");
          runtime.trace(|| RuntimeEvent::BehaviorReplaced { actor_id });
        }
      }
      Err(payload) => {
        // The failed invocation's become is dropped with it.
        let _ = ctx.take_next_behavior();
        let reason = panic_reason(payload.as_ref());
        tracing::error!(actor_id, %reason, "Behavior panicked; keeping the previous behavior");
        runtime.trace(|| RuntimeEvent::BehaviorPanicked { actor_id, reason });
      }
    }

    // Counted only now that the invocation has returned.
    runtime.message_processed(actor_id);

    delivered += 1;
    if delivered % DELIVERIES_PER_YIELD == 0 {
      tokio::task::yield_now().await;
    }
  }

  drop_guard.waive();
  tracing::debug!(actor_id, delivered, "Actor behavior loop finished (mailbox closed).");
  runtime.trace(|| RuntimeEvent::ActorStopped { actor_id });
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  }
}
