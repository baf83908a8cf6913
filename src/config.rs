// src/config.rs

use crate::runtime::DEFAULT_EVENT_BUS_CAPACITY;

use std::time::Duration;

/// How long `Runtime::shutdown` waits for behavior loops to exit.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Tunables for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
  /// Publish every enqueue, dequeue and completed delivery on the event bus
  /// (see `Runtime::subscribe`). Off by default.
  pub trace: bool,
  /// Capacity of the trace event broadcast channel. Minimum 1.
  pub event_bus_capacity: usize,
  /// Log a warning whenever a mailbox backlog reaches a multiple of this depth.
  pub mailbox_depth_warning: Option<usize>,
  /// Upper bound on `Runtime::shutdown` waiting for behavior loops to exit.
  pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
  fn default() -> Self {
    Self {
      trace: false,
      event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
      mailbox_depth_warning: None,
      shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
    }
  }
}

impl RuntimeConfig {
  pub fn with_trace(mut self, trace: bool) -> Self {
    self.trace = trace;
    self
  }

  pub fn with_event_bus_capacity(mut self, capacity: usize) -> Self {
    self.event_bus_capacity = capacity.max(1);
    self
  }

  /// A depth of zero disables the warning.
  pub fn with_mailbox_depth_warning(mut self, depth: usize) -> Self {
    self.mailbox_depth_warning = (depth > 0).then_some(depth);
    self
  }

  pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
    self.shutdown_timeout = timeout;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn setters_clamp_degenerate_values() {
    let config = RuntimeConfig::default()
      .with_trace(true)
      .with_event_bus_capacity(0)
      .with_mailbox_depth_warning(0);
    assert!(config.trace);
    assert_eq!(config.event_bus_capacity, 1);
    assert_eq!(config.mailbox_depth_warning, None);
    assert_eq!(config.shutdown_timeout, DEFAULT_SHUTDOWN_TIMEOUT);
  }
}
