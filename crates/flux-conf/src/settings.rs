//! Flux settings

use serde::{Deserialize, Serialize};

/// Default table holding grid content
pub const DEFAULT_CONTENT_TABLE: &str = "tt_content";

/// Default field providers are resolved for
pub const DEFAULT_GRID_FIELD: &str = "pi_flexform";

/// Settings consumed by the cascade engine and hooks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxSettings {
	/// Surface grid descriptor failures instead of skipping the cascade.
	///
	/// When off, a failing descriptor is logged at `WARN` and the command
	/// proceeds without touching children.
	pub strict_errors: bool,

	/// Reject local column numbers outside `0..=99`
	pub validate_addresses: bool,

	/// Tables cascades run on
	pub grid_tables: Vec<String>,

	/// Configuration field used to resolve providers
	pub grid_field: String,
}

impl Default for FluxSettings {
	fn default() -> Self {
		Self {
			strict_errors: false,
			validate_addresses: true,
			grid_tables: vec![DEFAULT_CONTENT_TABLE.to_string()],
			grid_field: DEFAULT_GRID_FIELD.to_string(),
		}
	}
}

impl FluxSettings {
	/// Enable or disable strict error reporting
	pub fn with_strict_errors(mut self, strict: bool) -> Self {
		self.strict_errors = strict;
		self
	}

	/// Enable or disable local column validation
	pub fn with_address_validation(mut self, enabled: bool) -> Self {
		self.validate_addresses = enabled;
		self
	}

	/// Replace the list of grid tables
	pub fn with_grid_tables<I, S>(mut self, tables: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.grid_tables = tables.into_iter().map(Into::into).collect();
		self
	}

	/// Set the provider resolution field
	pub fn with_grid_field(mut self, field: impl Into<String>) -> Self {
		self.grid_field = field.into();
		self
	}

	/// Whether cascades run for `table`
	pub fn is_grid_table(&self, table: &str) -> bool {
		self.grid_tables.iter().any(|t| t == table)
	}
}
