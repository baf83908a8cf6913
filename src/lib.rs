// src/lib.rs

//! tinyactor - a minimal in-process actor runtime on Tokio.
//!
//! Every actor owns one FIFO mailbox and processes its messages one at a time
//! with its current *behavior*. A behavior may `become` another behavior,
//! which takes over from the next message on. The [`Runtime`] counts every
//! message from the moment it is accepted into a mailbox until its behavior
//! invocation returns, so [`Runtime::wait`] knows when no work is left anywhere.
//!
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use tinyactor::{message, ActorContext, ActorRef, Behavior, Message, Runtime};
//!
//! fn replier(_ctx: &mut ActorContext, msg: Message) {
//!   if let (Some(customer), Some("ping")) = (msg.get::<ActorRef>(0), msg.str_at(1)) {
//!     customer.send(message!["reply"]);
//!   }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!   let runtime = Runtime::new().unwrap();
//!   let replied = Arc::new(AtomicBool::new(false));
//!
//!   let flag = replied.clone();
//!   let requester = runtime.create(Behavior::new(move |ctx, msg| match msg.str_at(0) {
//!     Some("start") => {
//!       let replier = ctx.create(replier);
//!       replier.send(message![ctx.myself().clone(), "ping"]);
//!     }
//!     Some("reply") => flag.store(true, Ordering::SeqCst),
//!     _ => {}
//!   }));
//!
//!   requester.send(message!["start"]);
//!   runtime.wait().await;
//!   assert!(replied.load(Ordering::SeqCst));
//! }
//! ```
//!
//! Messages sent after [`Runtime::wait`] returns are tracked as well; waiting
//! again waits for them. A runtime that never receives a message never becomes
//! quiescent.

/// Actor handles, behaviors, and the per-actor behavior loop.
pub mod actor;
/// Runtime tunables.
pub mod config;
/// Defines the error type used throughout the library.
pub mod error;
/// Message payloads and the `message!` helper.
pub mod message;
/// Internal coordination primitives (mailboxes, counters) and trace events.
pub mod runtime;
/// The `Runtime` handle: actor creation and quiescence.
pub mod system;

// Re-export core types for user convenience (e.g. `tinyactor::Runtime`).
pub use actor::{ActorContext, ActorId, ActorRef, Behavior};
pub use config::RuntimeConfig;
pub use error::ActorError;
pub use message::{Message, Param};
pub use runtime::RuntimeEvent;
pub use system::{runtime, Runtime};
