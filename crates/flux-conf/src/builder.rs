//! Settings builder merging configuration sources

use crate::settings::FluxSettings;
use crate::sources::{ConfigSource, EnvSource, SourceError, TomlFileSource};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;

const KNOWN_KEYS: &[&str] = &[
	"strict_errors",
	"validate_addresses",
	"grid_tables",
	"grid_field",
];

/// Settings errors
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// A source failed to load
	#[error("Failed to load {source_description}: {error}")]
	Source {
		/// Description of the failing source
		source_description: String,
		/// Underlying error
		#[source]
		error: SourceError,
	},

	/// Merged values do not form valid settings
	#[error("Invalid settings: {0}")]
	Invalid(#[from] serde_json::Error),
}

/// Builds [`FluxSettings`] from layered sources
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create a builder without sources; building it yields the defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder reading `path` (TOML) and `FLUX_*` environment variables
	pub fn standard(path: impl Into<PathBuf>) -> Self {
		Self::new()
			.add_source(TomlFileSource::new(path))
			.add_source(EnvSource::new())
	}

	/// Add a source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge all sources and deserialize the result
	pub fn build(mut self) -> Result<FluxSettings, SettingsError> {
		// Stable sort keeps insertion order among equal priorities.
		self.sources.sort_by_key(|source| source.priority());

		let mut merged: IndexMap<String, Value> = IndexMap::new();
		for source in &self.sources {
			let values = source.load().map_err(|error| SettingsError::Source {
				source_description: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			for (key, value) in values {
				if !KNOWN_KEYS.contains(&key.as_str()) {
					tracing::warn!(key = %key, source = %source.description(), "ignoring unknown setting");
					continue;
				}
				merged.insert(key, value);
			}
		}

		let object: serde_json::Map<String, Value> = merged.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::DefaultSource;
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	#[rstest]
	fn test_empty_builder_yields_defaults() {
		let settings = SettingsBuilder::new().build().unwrap();
		assert_eq!(settings, FluxSettings::default());
	}

	#[rstest]
	fn test_higher_priority_wins() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("flux.toml");
		fs::write(
			&path,
			"strict_errors = false\ngrid_field = \"flexform\"\n",
		)
		.unwrap();

		let settings = SettingsBuilder::new()
			.add_source(EnvSource::new().with_vars([("FLUX_STRICT_ERRORS", "1")]))
			.add_source(TomlFileSource::new(&path))
			.add_source(DefaultSource::new().with_value("grid_field", Value::from("ignored")))
			.build()
			.unwrap();

		assert!(settings.strict_errors);
		assert_eq!(settings.grid_field, "flexform");
	}

	#[rstest]
	fn test_unknown_keys_are_ignored() {
		let settings = SettingsBuilder::new()
			.add_source(
				DefaultSource::new()
					.with_value("colour", Value::from("blue"))
					.with_value("validate_addresses", Value::Bool(false)),
			)
			.build()
			.unwrap();

		assert!(!settings.validate_addresses);
	}

	#[rstest]
	fn test_invalid_value_is_reported() {
		let result = SettingsBuilder::new()
			.add_source(EnvSource::new().with_vars([("FLUX_STRICT_ERRORS", "sometimes")]))
			.build();

		assert!(matches!(result, Err(SettingsError::Invalid(_))));
	}

	#[rstest]
	fn test_source_failure_names_source() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("flux.toml");
		fs::write(&path, "grid_tables = [").unwrap();

		let err = SettingsBuilder::new()
			.add_source(TomlFileSource::new(&path))
			.build()
			.unwrap_err();

		assert!(err.to_string().contains("TOML file"));
	}
}
