//! Configuration sources for layered settings
//!
//! Sources are merged in priority order (environment variables > config files >
//! defaults).

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Prefix of environment variables read by [`EnvSource`]
pub const ENV_PREFIX: &str = "FLUX_";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	/// File could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Content has the wrong shape
	#[error("Parse error: {0}")]
	Parse(String),

	/// TOML syntax error
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// JSON conversion error
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Environment variable configuration source
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Read variables starting with [`ENV_PREFIX`]
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			vars: None,
		}
	}

	/// Use another prefix
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Read from a fixed set of variables instead of the process environment
	pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		);
		self
	}

	fn parse_value(key: &str, value: String) -> Value {
		match key {
			"strict_errors" | "validate_addresses" => {
				match value.trim().to_lowercase().as_str() {
					"true" | "1" | "yes" | "on" => Value::Bool(true),
					"false" | "0" | "no" | "off" => Value::Bool(false),
					_ => Value::String(value),
				}
			}
			"grid_tables" => Value::Array(
				value
					.split(',')
					.map(str::trim)
					.filter(|s| !s.is_empty())
					.map(|s| Value::String(s.to_string()))
					.collect(),
			),
			_ => Value::String(value),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let vars = match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		};

		let mut config = IndexMap::new();
		for (key, value) in vars {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			let lower_key = clean_key.to_lowercase();
			let parsed = Self::parse_value(&lower_key, value);
			config.insert(lower_key, parsed);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// TOML file configuration source
///
/// Settings may sit at the root of the file or under a `[flux]` table.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a source for `path`; a missing file yields no values
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		let map = json_value
			.as_object()
			.ok_or_else(|| SourceError::Parse("Expected table at root".to_string()))?;
		let map = match map.get("flux") {
			Some(Value::Object(section)) => section,
			Some(_) => {
				return Err(SourceError::Parse("[flux] must be a table".to_string()));
			}
			None => map,
		};

		Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Default values configuration source
#[derive(Default)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default source
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a default value
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}
