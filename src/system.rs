use crate::actor::{executor, ActorContext, ActorId, ActorRef, Behavior};
use crate::config::RuntimeConfig;
use crate::error::ActorError;
use crate::runtime::{mailbox, ActorDropGuard, EventBus, InFlight, MailboxSender, RuntimeEvent, WaitGroup};

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::broadcast;

/// Holds the state shared by every `Runtime` handle and every `ActorRef`.
pub(crate) struct RuntimeInner {
  /// Source for the next actor id. Ids start at 1.
  next_actor_id: AtomicUsize,
  /// Mailboxes of actors whose behavior loop is still running, so shutdown can
  /// close them.
  actors: parking_lot::RwLock<HashMap<ActorId, MailboxSender>>,
  /// Accepted-but-unprocessed messages across all actors.
  in_flight: InFlight,
  /// One registration per running behavior loop; `shutdown` waits on it.
  actor_wait_group: WaitGroup,
  event_bus: EventBus,
  /// Set once, under the `actors` write lock.
  shutdown_initiated: AtomicBool,
  config: RuntimeConfig,
  /// Where behavior loops are spawned.
  handle: Handle,
}

impl RuntimeInner {
  fn new(config: RuntimeConfig, handle: Handle) -> Self {
    Self {
      next_actor_id: AtomicUsize::new(1),
      actors: parking_lot::RwLock::new(HashMap::new()),
      in_flight: InFlight::new(),
      actor_wait_group: WaitGroup::new(),
      event_bus: EventBus::with_capacity(config.event_bus_capacity),
      shutdown_initiated: AtomicBool::new(false),
      config,
      handle,
    }
  }

  pub(crate) fn in_flight(&self) -> &InFlight {
    &self.in_flight
  }

  /// Publishes a trace event, building it only if tracing is enabled.
  pub(crate) fn trace(&self, event: impl FnOnce() -> RuntimeEvent) {
    if self.config.trace {
      self.event_bus.publish(event());
    }
  }

  pub(crate) fn check_mailbox_depth(&self, actor_id: ActorId, depth: usize) {
    // The field is public, so `Some(0)` can bypass the setter.
    if let Some(limit) = self.config.mailbox_depth_warning.filter(|limit| *limit > 0) {
      if depth >= limit && depth % limit == 0 {
        tracing::warn!(actor_id, depth, limit, "Mailbox backlog is growing");
      }
    }
  }

  /// Creates the mailbox and spawns the behavior loop for a new actor.
  pub(crate) fn spawn_actor(self: &Arc<Self>, behavior: Behavior, parent_id: Option<ActorId>) -> ActorRef {
    let actor_id = self.next_actor_id.fetch_add(1, AtomicOrdering::Relaxed);
    let (sender, receiver) = mailbox();

    {
      let mut actors = self.actors.write();
      if self.shutdown_initiated.load(AtomicOrdering::Acquire) {
        // Never runs; every send to it is discarded.
        sender.close();
        tracing::warn!(actor_id, ?parent_id, "Actor created after runtime shutdown will not run");
        return ActorRef::new(actor_id, sender, self.clone());
      }
      actors.insert(actor_id, sender.clone());
      self.actor_wait_group.add(1);
    }

    let actor_ref = ActorRef::new(actor_id, sender, self.clone());
    let ctx = ActorContext::new(actor_ref.clone());
    let drop_guard = ActorDropGuard::new(self.clone(), actor_id);

    tracing::debug!(actor_id, ?parent_id, "Creating actor");
    self.trace(|| RuntimeEvent::ActorCreated { actor_id, parent_id });
    self
      .handle
      .spawn(executor::run_behavior_loop(ctx, behavior, receiver, drop_guard));

    actor_ref
  }

  /// Called by a behavior loop once per message, after the behavior returned.
  pub(crate) fn message_processed(&self, actor_id: ActorId) {
    let completion = self.in_flight.complete();
    tracing::trace!(actor_id, in_flight = completion.remaining, "Message processed");
    self.trace(|| RuntimeEvent::Delivered {
      actor_id,
      in_flight: completion.remaining,
    });

    if completion.remaining == 0 {
      if completion.first_quiescence {
        tracing::info!("Runtime quiescent: every accepted message has been processed");
      } else {
        tracing::debug!("Runtime quiescent again");
      }
      self.trace(|| RuntimeEvent::Quiescent {
        first: completion.first_quiescence,
      });
    }
  }

  /// Unregisters an actor whose behavior loop has ended. Called from `ActorDropGuard`.
  pub(crate) fn actor_stopped(&self, actor_id: ActorId) {
    let removed = self.actors.write().remove(&actor_id).is_some();
    if removed {
      self.actor_wait_group.done();
      tracing::debug!(actor_id, "Actor unregistered");
    } else if !std::thread::panicking() {
      tracing::warn!(actor_id, "Attempted to unregister unknown actor");
    }
  }

  /// Marks the runtime as shut down and closes every registered mailbox.
  /// Behavior loops drain what they already accepted, then exit.
  ///
  /// Returns `false` if shutdown had already been initiated.
  fn close_mailboxes(&self) -> bool {
    let actors = self.actors.write();
    if self.shutdown_initiated.swap(true, AtomicOrdering::AcqRel) {
      tracing::debug!("Runtime shutdown already initiated.");
      return false;
    }
    tracing::info!(actors = actors.len(), "Runtime shutdown initiated.");
    for sender in actors.values() {
      sender.close();
    }
    true
  }

  /// Closes every mailbox and waits for the behavior loops to drain and exit.
  async fn shutdown(&self) -> Result<(), ActorError> {
    self.close_mailboxes();

    let wait_timeout = self.config.shutdown_timeout;
    match tokio::time::timeout(wait_timeout, self.actor_wait_group.wait()).await {
      Ok(()) => {
        tracing::info!("Runtime shutdown complete (all behavior loops exited).");
        Ok(())
      }
      Err(_) => {
        let remaining = self.actor_wait_group.count();
        tracing::error!(
          remaining,
          timeout = ?wait_timeout,
          "Runtime shutdown timed out! {} behavior loops are still running.",
          remaining
        );
        Err(ActorError::Timeout(wait_timeout))
      }
    }
  }
}

/// A handle to an actor runtime: creates actors and reports when all their
/// work is done. `Runtime` handles are cloneable (`Arc`-based).
///
/// Dropping the last handle the caller holds shuts the runtime down without
/// waiting: mailboxes close, already accepted messages are still processed,
/// and the actors are then released.
///
/// ```
/// use tinyactor::{message, ActorContext, Message, Runtime};
///
/// fn print(_ctx: &mut ActorContext, msg: Message) {
///   println!("{}", msg.str_at(0).unwrap_or_default());
/// }
///
/// #[tokio::main]
/// async fn main() {
///   let runtime = Runtime::new().unwrap();
///   let printer = runtime.create(print);
///   printer.send(message!["hello world"]);
///   runtime.wait().await;
///   assert_eq!(runtime.in_flight(), 0);
/// }
/// ```
#[derive(Clone)]
pub struct Runtime {
  inner: Arc<RuntimeInner>,
  // `None` for handles obtained from inside an actor (`ActorContext::runtime`),
  // which must not keep the actors' own runtime alive.
  owner: Option<Arc<RuntimeOwner>>,
}

/// Shared by every handle the caller holds. The last one to go closes all
/// mailboxes; behavior loops then drain and release their behaviors.
struct RuntimeOwner {
  inner: Arc<RuntimeInner>,
}

impl Drop for RuntimeOwner {
  fn drop(&mut self) {
    tracing::debug!("Last Runtime handle dropped, closing mailboxes");
    self.inner.close_mailboxes();
  }
}

impl Runtime {
  /// Creates a runtime with default settings on the current Tokio runtime.
  pub fn new() -> Result<Self, ActorError> {
    Self::with_config(RuntimeConfig::default())
  }

  /// Creates a runtime on the current Tokio runtime.
  ///
  /// Fails with `ActorError::NoReactor` outside a Tokio context; use
  /// [`Runtime::with_handle`] from synchronous code.
  pub fn with_config(config: RuntimeConfig) -> Result<Self, ActorError> {
    let handle = Handle::try_current().map_err(|_| ActorError::NoReactor)?;
    Ok(Self::with_handle(handle, config))
  }

  /// Creates a runtime whose actors run on the given Tokio runtime.
  pub fn with_handle(handle: Handle, config: RuntimeConfig) -> Self {
    tracing::debug!(trace = config.trace, "Creating new actor Runtime");
    let inner = Arc::new(RuntimeInner::new(config, handle));
    Self {
      owner: Some(Arc::new(RuntimeOwner { inner: inner.clone() })),
      inner,
    }
  }

  /// A handle that does not count towards keeping the runtime alive.
  pub(crate) fn from_inner(inner: Arc<RuntimeInner>) -> Self {
    Self { inner, owner: None }
  }

  /// Spawns an actor with `behavior` as its initial behavior.
  ///
  /// Safe to call from anywhere, including from inside behaviors.
  pub fn create(&self, behavior: impl Into<Behavior>) -> ActorRef {
    self.inner.spawn_actor(behavior.into(), None)
  }

  /// Waits until every accepted message has been fully processed.
  ///
  /// Returns only after at least one message has been sent: on a runtime that
  /// never receives a message this waits forever. Once the runtime has been
  /// quiescent, further calls return immediately unless new messages were
  /// sent in between, in which case they wait for those too.
  ///
  /// If some actor waits for a message nobody will ever send, this never
  /// returns; the engine cannot tell such a deadlock from slow work. Use
  /// [`Runtime::wait_timeout`] to bound the wait.
  pub async fn wait(&self) {
    tracing::debug!(in_flight = self.in_flight(), "Waiting for runtime quiescence");
    self.inner.in_flight.wait().await;
    tracing::debug!("Runtime wait released");
  }

  /// [`Runtime::wait`] with an upper bound.
  pub async fn wait_timeout(&self, timeout: Duration) -> Result<(), ActorError> {
    match tokio::time::timeout(timeout, self.wait()).await {
      Ok(()) => Ok(()),
      Err(_) => {
        tracing::warn!(
          in_flight = self.in_flight(),
          timeout = ?timeout,
          "Timed out waiting for runtime quiescence"
        );
        Err(ActorError::Timeout(timeout))
      }
    }
  }

  /// Blocks the calling thread until [`Runtime::wait`] would return.
  ///
  /// For synchronous callers whose actors run on a Tokio runtime created with
  /// [`Runtime::with_handle`]. Must not be called from async code.
  pub fn wait_blocking(&self) {
    futures::executor::block_on(self.wait())
  }

  /// Messages accepted but not yet fully processed, across all actors.
  pub fn in_flight(&self) -> usize {
    self.inner.in_flight.count()
  }

  /// Whether the one-shot completion signal has fired.
  pub fn is_complete(&self) -> bool {
    self.inner.in_flight.is_complete()
  }

  /// Number of actors whose behavior loop is running.
  pub fn actor_count(&self) -> usize {
    self.inner.actors.read().len()
  }

  /// Subscribes to delivery trace events. Only published with `RuntimeConfig::trace`.
  pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
    self.inner.event_bus.subscribe()
  }

  /// The settings this runtime was created with.
  pub fn config(&self) -> &RuntimeConfig {
    &self.inner.config
  }

  /// Closes every mailbox, lets each actor finish the messages it already
  /// accepted, and waits (up to `RuntimeConfig::shutdown_timeout`) for all
  /// behavior loops to exit. Sends after this point are discarded.
  pub async fn shutdown(&self) -> Result<(), ActorError> {
    self.inner.shutdown().await
  }

  /// Whether `shutdown` was called or the last owning handle was dropped.
  pub fn is_shut_down(&self) -> bool {
    self.inner.shutdown_initiated.load(AtomicOrdering::Acquire)
  }
}

impl fmt::Debug for Runtime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Runtime")
      .field("actors", &self.actor_count())
      .field("in_flight", &self.in_flight())
      .field("complete", &self.is_complete())
      .field("trace_subscribers", &self.inner.event_bus.subscriber_count())
      .field("owning", &self.owner.is_some())
      .finish_non_exhaustive()
  }
}

/// Creates a new runtime on the current Tokio runtime. Equivalent to `Runtime::new()`.
pub fn runtime() -> Result<Runtime, ActorError> {
  Runtime::new()
}
