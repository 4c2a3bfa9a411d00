//! Error types shared by the Flux crates

use crate::Uid;
use thiserror::Error;

/// Flux errors
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum FluxError {
	/// Malformed virtual column number or local column out of range
	#[error("Invalid column address: {0}")]
	Addressing(String),

	/// A configuration provider failed while building a grid
	#[error("Provider '{provider}' failed to build grid: {message}")]
	DescriptorBuild {
		/// Provider name
		provider: String,
		/// Failure description
		message: String,
	},

	/// Record expected by a hook is missing from the store
	#[error("Record not found: {table}:{uid}")]
	RecordNotFound {
		/// Table name
		table: String,
		/// Record uid
		uid: Uid,
	},

	/// Failure raised by a record store or mutation port
	#[error("Record store error: {0}")]
	Store(String),

	/// Host command with a value the cascade cannot interpret
	#[error("Invalid command: {0}")]
	InvalidCommand(String),
}

impl FluxError {
	/// Build a [`FluxError::RecordNotFound`]
	pub fn not_found(table: impl Into<String>, uid: Uid) -> Self {
		Self::RecordNotFound {
			table: table.into(),
			uid,
		}
	}

	/// Whether this error originates from grid descriptor resolution
	pub fn is_descriptor_failure(&self) -> bool {
		matches!(self, Self::DescriptorBuild { .. })
	}
}

/// Result type for Flux operations
pub type FluxResult<T> = Result<T, FluxError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = FluxError::DescriptorBuild {
			provider: "payload".to_string(),
			message: "expected value".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Provider 'payload' failed to build grid: expected value"
		);
		assert!(err.is_descriptor_failure());

		let err = FluxError::not_found("tt_content", 12);
		assert_eq!(err.to_string(), "Record not found: tt_content:12");
		assert!(!err.is_descriptor_failure());
	}
}
