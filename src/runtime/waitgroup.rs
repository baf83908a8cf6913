// src/runtime/waitgroup.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// An asynchronous WaitGroup, similar to Go's `sync.WaitGroup`.
///
/// Work is registered with `add` and released with `done`. Waiters are woken
/// every time the counter drops to zero; the counter may rise again afterwards.
#[derive(Debug, Clone)]
pub(crate) struct WaitGroup {
  count: Arc<AtomicUsize>,
  notify_on_zero: Arc<Notify>,
}

impl WaitGroup {
  /// Creates a new WaitGroup with an initial count of zero.
  pub fn new() -> Self {
    Self {
      count: Arc::new(AtomicUsize::new(0)),
      notify_on_zero: Arc::new(Notify::new()),
    }
  }

  /// Adds a delta to the counter and returns the new count.
  pub fn add(&self, delta: usize) -> usize {
    let old_count = self.count.fetch_add(delta, Ordering::AcqRel);
    if old_count == 0 && delta > 0 {
      tracing::trace!(delta, "WaitGroup count increased from zero");
    }
    old_count + delta
  }

  /// Decrements the counter by one and returns the remaining count.
  ///
  /// Waiters are notified when the count reaches zero.
  ///
  /// Panics if the counter would drop below zero: more releases than
  /// registrations means the caller's bookkeeping is corrupt.
  pub fn done(&self) -> usize {
    // AcqRel: work done before done() is visible to whoever observes the zero.
    let previous = self
      .count
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| current.checked_sub(1));

    match previous {
      Ok(1) => {
        tracing::trace!("WaitGroup count reached zero, notifying waiters");
        self.notify_on_zero.notify_waiters();
        0
      }
      Ok(old_count) => old_count - 1,
      Err(_) => panic!("WaitGroup::done() called when count was already zero!"),
    }
  }

  /// Waits until the counter is zero. Returns immediately if it already is.
  pub async fn wait(&self) {
    self.wait_until(|| self.count() == 0).await
  }

  /// Waits until `ready` holds, re-checking it each time the counter reaches zero.
  ///
  /// `ready` must only become true at a zero crossing, otherwise the waiter may
  /// sleep through it.
  pub async fn wait_until(&self, ready: impl Fn() -> bool) {
    loop {
      // Register interest before checking so a concurrent notify_waiters()
      // between the check and the await is not lost.
      let notified = self.notify_on_zero.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();

      if ready() {
        return;
      }
      notified.await;
      tracing::trace!("WaitGroup waiter woke, re-checking condition");
    }
  }

  /// Returns the current count.
  pub fn count(&self) -> usize {
    self.count.load(Ordering::Acquire)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use tokio::time::timeout;

  #[tokio::test]
  async fn test_waitgroup_add_done_wait() {
    let wg = WaitGroup::new();
    assert_eq!(wg.add(2), 2);

    let wg_clone1 = wg.clone();
    let task1 = tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(10)).await;
      wg_clone1.done()
    });

    // Barrier to control the second release
    let notify = Arc::new(Notify::new());
    let notify_clone = notify.clone();
    let wg_clone2 = wg.clone();
    let task2 = tokio::spawn(async move {
      notify_clone.notified().await;
      wg_clone2.done()
    });

    let wg_clone_wait = wg.clone();
    let mut wait_task = tokio::spawn(async move { wg_clone_wait.wait().await });

    assert_eq!(task1.await.unwrap(), 1);
    assert!(
      timeout(Duration::from_millis(20), &mut wait_task).await.is_err(),
      "Wait task should not have finished yet"
    );

    notify.notify_one();
    assert_eq!(task2.await.unwrap(), 0);
    assert!(timeout(Duration::from_millis(200), wait_task).await.is_ok());
    assert_eq!(wg.count(), 0);
  }

  #[tokio::test]
  async fn test_waitgroup_wait_on_zero() {
    let wg = WaitGroup::new();
    assert!(timeout(Duration::from_millis(10), wg.wait()).await.is_ok());
  }

  #[tokio::test]
  async fn test_waitgroup_add_after_wait_starts() {
    let wg = WaitGroup::new();
    wg.add(1);

    let wg_clone_wait = wg.clone();
    let mut wait_task = tokio::spawn(async move { wg_clone_wait.wait().await });
    tokio::task::yield_now().await;

    wg.add(1);
    assert_eq!(wg.done(), 1);
    assert!(
      timeout(Duration::from_millis(10), &mut wait_task).await.is_err(),
      "Wait task should still be blocked after one done()"
    );

    assert_eq!(wg.done(), 0);
    assert!(timeout(Duration::from_millis(200), wait_task).await.is_ok());
  }

  #[test]
  #[should_panic(expected = "already zero")]
  fn test_waitgroup_done_panic_on_zero() {
    let wg = WaitGroup::new();
    wg.done();
  }
}
