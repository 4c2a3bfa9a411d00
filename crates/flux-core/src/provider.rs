//! Configuration providers
//!
//! A provider knows how to turn a record into a grid descriptor. Which provider
//! is responsible for a record is decided by a [`ProviderResolver`], keyed by
//! table name, field name and the record itself. Provider variants live behind
//! the [`Provider`] trait; [`ProviderRegistry`] is the resolver used by default.

use crate::grid::GridDescriptor;
use crate::record::Record;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by a provider while building a grid
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
	message: String,
}

impl ProviderError {
	/// Create a provider error
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// Failure description
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Capability that builds grid descriptors for records
pub trait Provider: Send + Sync {
	/// Name used in logs and errors
	fn name(&self) -> &str;

	/// Build the grid of `record`, `None` when the record exposes no grid
	fn grid(&self, record: &Record) -> Result<Option<GridDescriptor>, ProviderError>;
}

/// Lookup of the primary provider responsible for a record
pub trait ProviderResolver: Send + Sync {
	/// Resolve the provider for `record` stored in `table`, configured through `field`
	fn resolve_primary_provider(
		&self,
		table: &str,
		field: &str,
		record: &Record,
	) -> Option<Arc<dyn Provider>>;
}

type RecordMatcher = Box<dyn Fn(&Record) -> bool + Send + Sync>;

/// A provider together with the records it is responsible for
pub struct ProviderRegistration {
	table: String,
	field: Option<String>,
	matcher: Option<RecordMatcher>,
	priority: i32,
	provider: Arc<dyn Provider>,
}

impl ProviderRegistration {
	/// Register `provider` for every record of `table`
	pub fn new(table: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
		Self {
			table: table.into(),
			field: None,
			matcher: None,
			priority: 0,
			provider,
		}
	}

	/// Restrict to one configuration field
	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		self.field = Some(field.into());
		self
	}

	/// Restrict to records accepted by `matcher`
	pub fn with_matcher<F>(mut self, matcher: F) -> Self
	where
		F: Fn(&Record) -> bool + Send + Sync + 'static,
	{
		self.matcher = Some(Box::new(matcher));
		self
	}

	/// Set the priority; higher wins
	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	fn matches(&self, table: &str, field: &str, record: &Record) -> bool {
		self.table == table
			&& self.field.as_deref().is_none_or(|f| f == field)
			&& self.matcher.as_ref().is_none_or(|m| m(record))
	}
}

impl fmt::Debug for ProviderRegistration {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ProviderRegistration")
			.field("table", &self.table)
			.field("field", &self.field)
			.field("has_matcher", &self.matcher.is_some())
			.field("priority", &self.priority)
			.field("provider", &self.provider.name())
			.finish()
	}
}

/// Registry of providers, resolving the highest-priority match
#[derive(Debug, Default)]
pub struct ProviderRegistry {
	registrations: Vec<ProviderRegistration>,
}

impl ProviderRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a registration
	pub fn register(&mut self, registration: ProviderRegistration) -> &mut Self {
		tracing::debug!(
			table = %registration.table,
			provider = registration.provider.name(),
			priority = registration.priority,
			"registered grid provider"
		);
		self.registrations.push(registration);
		self
	}

	/// Number of registrations
	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	/// Whether nothing is registered
	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}
}

impl ProviderResolver for ProviderRegistry {
	fn resolve_primary_provider(
		&self,
		table: &str,
		field: &str,
		record: &Record,
	) -> Option<Arc<dyn Provider>> {
		let mut primary: Option<&ProviderRegistration> = None;
		for registration in &self.registrations {
			if !registration.matches(table, field, record) {
				continue;
			}
			// Earlier registrations win ties.
			if primary.is_none_or(|current| registration.priority > current.priority) {
				primary = Some(registration);
			}
		}
		primary.map(|registration| Arc::clone(&registration.provider))
	}
}

/// Reads the grid from the record's payload, stored as JSON
#[derive(Debug, Clone, Default)]
pub struct PayloadGridProvider;

impl PayloadGridProvider {
	/// Create the provider
	pub fn new() -> Self {
		Self
	}
}

impl Provider for PayloadGridProvider {
	fn name(&self) -> &str {
		"payload"
	}

	fn grid(&self, record: &Record) -> Result<Option<GridDescriptor>, ProviderError> {
		if !record.has_grid_payload() {
			return Ok(None);
		}
		let payload = record.grid_payload.as_deref().unwrap_or_default();
		let grid: GridDescriptor = serde_json::from_str(payload)
			.map_err(|e| ProviderError::new(format!("invalid grid payload: {}", e)))?;
		Ok(Some(grid))
	}
}

/// Returns the same grid for every record it is asked about
#[derive(Debug, Clone)]
pub struct StaticGridProvider {
	name: String,
	grid: GridDescriptor,
}

impl StaticGridProvider {
	/// Create a provider serving `grid`
	pub fn new(name: impl Into<String>, grid: GridDescriptor) -> Self {
		Self {
			name: name.into(),
			grid,
		}
	}
}

impl Provider for StaticGridProvider {
	fn name(&self) -> &str {
		&self.name
	}

	fn grid(&self, _record: &Record) -> Result<Option<GridDescriptor>, ProviderError> {
		Ok(Some(self.grid.clone()))
	}
}
