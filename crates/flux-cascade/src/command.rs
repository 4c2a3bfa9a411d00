//! Cascade commands
//!
//! Host commands arrive as a name plus a loosely typed value (`copy` carries
//! the destination, `localize` the target language). They are parsed into a
//! [`CascadeCommand`] and passed by value into the engine together with the
//! copy mapping of the current batch.

use flux_core::{FluxError, FluxResult, Uid};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;

/// Host command names
pub mod names {
	/// Delete a record
	pub const DELETE: &str = "delete";
	/// Copy a record
	pub const COPY: &str = "copy";
	/// Copy a record into another language without translation linkage
	pub const COPY_TO_LANGUAGE: &str = "copyToLanguage";
	/// Translate a record
	pub const LOCALIZE: &str = "localize";
	/// Move a record
	pub const MOVE: &str = "move";
}

/// Command a cascade runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeCommand {
	/// Delete the children before the subject
	Delete,
	/// Copy the children along with the subject
	Copy,
	/// Copy the children into `language`, linked through the translation source
	CopyToLanguage {
		/// Target language
		language: i64,
	},
	/// Translate the children into `language`, linked through the translation parent
	Localize {
		/// Target language
		language: i64,
	},
}

impl CascadeCommand {
	/// Parse a host command.
	///
	/// Returns `Ok(None)` for commands without a cascade (`move`, `undelete`, ...).
	pub fn from_host(name: &str, value: &JsonValue) -> FluxResult<Option<Self>> {
		let command = match name {
			names::DELETE => Self::Delete,
			names::COPY => Self::Copy,
			names::COPY_TO_LANGUAGE => Self::CopyToLanguage {
				language: Self::language_of(name, value)?,
			},
			names::LOCALIZE => Self::Localize {
				language: Self::language_of(name, value)?,
			},
			_ => return Ok(None),
		};
		Ok(Some(command))
	}

	fn language_of(name: &str, value: &JsonValue) -> FluxResult<i64> {
		json_to_i64(value)
			.filter(|language| *language >= 0)
			.ok_or_else(|| {
				FluxError::InvalidCommand(format!("{} requires a language id, got {}", name, value))
			})
	}

	/// Host command name
	pub fn name(&self) -> &'static str {
		match self {
			Self::Delete => names::DELETE,
			Self::Copy => names::COPY,
			Self::CopyToLanguage { .. } => names::COPY_TO_LANGUAGE,
			Self::Localize { .. } => names::LOCALIZE,
		}
	}

	/// Target language of language commands
	pub fn target_language(&self) -> Option<i64> {
		match self {
			Self::CopyToLanguage { language } | Self::Localize { language } => Some(*language),
			Self::Delete | Self::Copy => None,
		}
	}

	/// Whether the cascade runs before the host executes the command
	pub fn is_pre_process(&self) -> bool {
		matches!(self, Self::Delete)
	}
}

impl fmt::Display for CascadeCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.target_language() {
			Some(language) => write!(f, "{}({})", self.name(), language),
			None => write!(f, "{}", self.name()),
		}
	}
}

/// A command invocation handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
	/// Command being processed
	pub command: CascadeCommand,
	/// Table of the subject record
	pub table: String,
	/// Uid of the subject record
	pub uid: Uid,
	/// Uids the host assigned to copies made so far in this batch (old -> new)
	pub copy_mapping: HashMap<Uid, Uid>,
}

impl CommandContext {
	/// Create a context without copy mapping
	pub fn new(command: CascadeCommand, table: impl Into<String>, uid: Uid) -> Self {
		Self {
			command,
			table: table.into(),
			uid,
			copy_mapping: HashMap::new(),
		}
	}

	/// Attach the batch copy mapping
	pub fn with_copy_mapping(mut self, copy_mapping: HashMap<Uid, Uid>) -> Self {
		self.copy_mapping = copy_mapping;
		self
	}

	/// Record that `old` was copied to `new`
	pub fn with_copy(mut self, old: Uid, new: Uid) -> Self {
		self.copy_mapping.insert(old, new);
		self
	}

	/// Uid of the copy made from `uid`
	pub fn copy_of(&self, uid: Uid) -> Option<Uid> {
		self.copy_mapping.get(&uid).copied()
	}
}

/// Read an integer from a host value, accepting numeric strings
pub fn json_to_i64(value: &JsonValue) -> Option<i64> {
	match value {
		JsonValue::Number(number) => number.as_i64(),
		JsonValue::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}
