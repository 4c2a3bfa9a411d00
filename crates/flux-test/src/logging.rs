//! Test logging utilities
//!
//! [`init_test_logging`] installs a global fmt subscriber writing through the
//! test harness. [`LogCapture`] records events of the current thread so tests
//! can assert on emitted warnings.

use parking_lot::Mutex;
use std::sync::{Arc, Once};
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

static INIT: Once = Once::new();

/// Initialize logging for tests (call once)
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_logging() {
	INIT.call_once(|| {
		let filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
		let _ = tracing_subscriber::fmt()
			.with_env_filter(filter)
			.with_test_writer()
			.try_init();
	});
}

/// Captured `[LEVEL] message` lines
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
	logs: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
	/// Create an empty capture
	pub fn new() -> Self {
		Self::default()
	}

	/// Install the capture for the current thread until the guard drops
	pub fn install(&self) -> tracing::subscriber::DefaultGuard {
		tracing_subscriber::registry()
			.with(self.clone())
			.set_default()
	}

	/// Captured lines so far
	pub fn lines(&self) -> Vec<String> {
		self.logs.lock().clone()
	}

	/// Whether a line at `level` contains `needle`
	pub fn contains(&self, level: tracing::Level, needle: &str) -> bool {
		let prefix = format!("[{}]", level);
		self.logs
			.lock()
			.iter()
			.any(|line| line.starts_with(&prefix) && line.contains(needle))
	}
}

struct MessageVisitor {
	message: String,
}

impl Visit for MessageVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
		if field.name() == "message" {
			self.message = format!("{:?}", value);
		}
	}
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
		let mut visitor = MessageVisitor {
			message: String::new(),
		};
		event.record(&mut visitor);
		self.logs
			.lock()
			.push(format!("[{}] {}", event.metadata().level(), visitor.message));
	}
}
