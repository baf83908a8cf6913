//! Actors: handles, behaviors, the context a behavior runs with, and the
//! per-actor behavior loop.

mod actor_ref;
mod behavior;
mod context;
pub(crate) mod executor;

pub use actor_ref::ActorRef;
pub use behavior::Behavior;
pub use context::ActorContext;

/// Runtime-unique actor identifier. Ids start at 1 and are never reused.
pub type ActorId = usize;
