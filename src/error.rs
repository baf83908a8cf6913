use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive] // Allows adding more variants later without breaking change
pub enum ActorError {
  // --- Payload Errors (raised by behaviors, never by the engine) ---
  #[error("Message has no parameter at index {index} (length {len})")]
  MissingParam { index: usize, len: usize },
  #[error("Message parameter at index {index} is not a {expected}")]
  ParamType { index: usize, expected: &'static str },

  // --- Timeouts ---
  #[error("Timed out after {0:?} waiting for quiescence")]
  Timeout(Duration),

  // --- Runtime Errors ---
  #[error("No Tokio runtime available to spawn actors on")]
  NoReactor,
}

impl ActorError {
  /// Builds a `ParamType` error naming the requested type.
  pub fn param_type<T: ?Sized>(index: usize) -> Self {
    ActorError::ParamType {
      index,
      expected: std::any::type_name::<T>(),
    }
  }
}
