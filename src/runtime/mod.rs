// src/runtime/mod.rs

//! Core asynchronous primitives: mailboxes, counters, and the trace event bus.

pub mod actor_drop_guard;
pub mod event_bus;
pub mod inflight;
pub mod mailbox;
pub mod system_events;
pub mod waitgroup;

pub(crate) use mailbox::{mailbox, Envelope, MailboxReceiver, MailboxSender};

// Trace events
pub(crate) use event_bus::EventBus;
pub use event_bus::DEFAULT_EVENT_BUS_CAPACITY;
pub use system_events::RuntimeEvent;

// Sync Primitives
pub(crate) use actor_drop_guard::ActorDropGuard;
pub(crate) use inflight::InFlight;
pub(crate) use waitgroup::WaitGroup;
