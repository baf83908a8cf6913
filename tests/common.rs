// tests/common.rs
#![allow(dead_code)] // Not every test file uses every helper

use tinyactor::{Runtime, RuntimeConfig, RuntimeEvent};
use tokio::sync::broadcast;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use tokio::time::timeout;

pub const SHORT_TIMEOUT: Duration = Duration::from_millis(250);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(5);

// Use std::sync::Once for one-time initialization
static TRACING_INIT: Once = Once::new();

// Setup function to initialize tracing
fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Can be overridden by RUST_LOG env variable
    let default_filter = "tinyactor=debug,warn";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_max_level(tracing::Level::TRACE)
      .with_env_filter(env_filter)
      .with_target(true) // Show module path
      .with_line_number(true)
      .with_span_events(FmtSpan::CLOSE)
      .with_test_writer() // Write to test output capture
      .finish();

    // Another test binary thread may have won the race; that's fine.
    let _ = tracing::subscriber::set_global_default(subscriber);
  });
}

/// Runtime with default settings on the current test's Tokio runtime.
pub fn test_runtime() -> Runtime {
  setup_tracing();
  Runtime::new().expect("Failed to create test runtime")
}

/// Runtime with the delivery trace enabled.
pub fn traced_runtime() -> Runtime {
  setup_tracing();
  Runtime::with_config(RuntimeConfig::default().with_trace(true).with_event_bus_capacity(4096))
    .expect("Failed to create traced test runtime")
}

/// `runtime.wait()` that fails the test instead of hanging it.
pub async fn wait_quiescent(runtime: &Runtime) {
  runtime
    .wait_timeout(LONG_TIMEOUT)
    .await
    .expect("runtime did not become quiescent");
}

/// Shared, append-only log that behaviors write into and tests read back.
#[derive(Clone)]
pub struct Recorder<T> {
  entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone> Recorder<T> {
  pub fn new() -> Self {
    Self {
      entries: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn push(&self, entry: T) {
    self.entries.lock().unwrap().push(entry);
  }

  pub fn snapshot(&self) -> Vec<T> {
    self.entries.lock().unwrap().clone()
  }

  pub fn len(&self) -> usize {
    self.entries.lock().unwrap().len()
  }
}

/// Drains trace events until `stop` matches one (inclusive) or the timeout hits.
pub async fn collect_events_until(
  rx: &mut broadcast::Receiver<RuntimeEvent>,
  stop: impl Fn(&RuntimeEvent) -> bool,
) -> Vec<RuntimeEvent> {
  let mut events = Vec::new();
  loop {
    match timeout(SHORT_TIMEOUT, rx.recv()).await {
      Ok(Ok(event)) => {
        let done = stop(&event);
        events.push(event);
        if done {
          return events;
        }
      }
      Ok(Err(broadcast::error::RecvError::Lagged(n))) => panic!("trace subscriber lagged by {} events", n),
      Ok(Err(broadcast::error::RecvError::Closed)) => return events,
      Err(_elapsed) => return events,
    }
  }
}
