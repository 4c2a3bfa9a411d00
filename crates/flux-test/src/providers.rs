//! Provider doubles

use flux_core::{
	GridDescriptor, PayloadGridProvider, Provider, ProviderError, ProviderRegistration,
	ProviderRegistry, Record,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Table every test registry serves
pub const CONTENT_TABLE: &str = "tt_content";

/// Provider that fails for every record and counts how often it was asked
#[derive(Debug, Default)]
pub struct FailingProvider {
	calls: AtomicUsize,
}

impl FailingProvider {
	/// Create the provider
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of `grid` calls so far
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl Provider for FailingProvider {
	fn name(&self) -> &str {
		"failing"
	}

	fn grid(&self, record: &Record) -> Result<Option<GridDescriptor>, ProviderError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Err(ProviderError::new(format!(
			"template of record {} could not be rendered",
			record.uid
		)))
	}
}

/// Registry serving grids from record payloads of [`CONTENT_TABLE`]
pub fn payload_registry() -> ProviderRegistry {
	let mut registry = ProviderRegistry::new();
	registry.register(ProviderRegistration::new(
		CONTENT_TABLE,
		Arc::new(PayloadGridProvider::new()),
	));
	registry
}

/// Registry whose only provider fails for records with a grid payload
pub fn failing_registry(provider: Arc<FailingProvider>) -> ProviderRegistry {
	let mut registry = ProviderRegistry::new();
	registry.register(
		ProviderRegistration::new(CONTENT_TABLE, provider)
			.with_matcher(|record| record.has_grid_payload()),
	);
	registry
}
