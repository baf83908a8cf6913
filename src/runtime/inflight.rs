// src/runtime/inflight.rs

//! The runtime-wide count of accepted-but-unprocessed messages.

use super::WaitGroup;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of finishing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Completion {
  /// Messages still in flight after this one.
  pub remaining: usize,
  /// `true` only for the decrement that fired the one-shot completion signal.
  pub first_quiescence: bool,
}

/// Counts messages from acceptance into a mailbox until their behavior
/// invocation has returned.
///
/// The count only ever moves through `accept`, `complete` and `retract`.
/// Quiescence is "zero after having been non-zero at least once"; a fresh
/// counter is not quiescent.
#[derive(Debug, Clone)]
pub(crate) struct InFlight {
  group: WaitGroup,
  armed: Arc<AtomicBool>,
  completed: Arc<AtomicBool>,
}

impl InFlight {
  pub fn new() -> Self {
    Self {
      group: WaitGroup::new(),
      armed: Arc::new(AtomicBool::new(false)),
      completed: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Counts a message about to be enqueued. Returns the new count.
  ///
  /// Must happen before the enqueue, so the consumer can never finish the
  /// message before it was counted.
  pub fn accept(&self) -> usize {
    let count = self.group.add(1);
    // Armed strictly after the increment: a waiter that sees `armed` also sees
    // this increment (or a later decrement).
    self.armed.store(true, Ordering::Release);
    count
  }

  /// Releases a count taken by `accept` whose enqueue was refused.
  pub fn retract(&self) -> usize {
    self.group.done()
  }

  /// Marks one message as fully processed.
  ///
  /// Panics if more messages complete than were accepted.
  pub fn complete(&self) -> Completion {
    let remaining = self.group.done();
    let first_quiescence = remaining == 0
      && self
        .completed
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok();
    Completion {
      remaining,
      first_quiescence,
    }
  }

  /// Zero in flight, and at least one message was ever accepted.
  pub fn is_quiescent(&self) -> bool {
    // Load order matters, see `accept`.
    self.armed.load(Ordering::Acquire) && self.group.count() == 0
  }

  /// Whether the one-shot completion signal has fired.
  pub fn is_complete(&self) -> bool {
    self.completed.load(Ordering::Acquire)
  }

  pub fn count(&self) -> usize {
    self.group.count()
  }

  /// Waits for quiescence. Does not return if no message is ever accepted.
  pub async fn wait(&self) {
    self.group.wait_until(|| self.is_quiescent()).await
  }
}
