//! Per-invocation cascade state

use crate::command::CascadeCommand;
use flux_core::{Record, Uid};

/// Everything a single cascade invocation works on.
///
/// Built from a fresh store read at the start of every invocation and dropped
/// when it ends.
#[derive(Debug, Clone)]
pub struct CascadeContext {
	/// Command being processed
	pub command: CascadeCommand,
	/// Table of the subject
	pub table: String,
	/// Snapshot of the subject record
	pub subject: Record,
	/// Uid the subject's children are addressed against
	pub translation_root: Uid,
	/// Virtual columns owned by the subject
	pub child_columns: Vec<i64>,
	/// Children in descending `sorting`
	pub children: Vec<Record>,
}

impl CascadeContext {
	/// Uids of the children in processing order
	pub fn child_uids(&self) -> Vec<Uid> {
		self.children.iter().map(|child| child.uid).collect()
	}
}

/// Outcome of a cascade invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
	/// Subject uid
	pub subject: Uid,
	/// Page of the subject, when the subject was loaded
	pub subject_pid: Option<Uid>,
	/// Children deleted, in order
	pub deleted: Vec<Uid>,
	/// Children copied or localized as `(original, new)`, in order
	pub created: Vec<(Uid, Uid)>,
	/// Descriptor failure skipped because strict errors are off
	pub skipped_error: Option<String>,
}

impl CascadeReport {
	/// Empty report for `subject`
	pub fn new(subject: Uid) -> Self {
		Self {
			subject,
			..Self::default()
		}
	}

	/// Whether no child was mutated
	pub fn is_noop(&self) -> bool {
		self.deleted.is_empty() && self.created.is_empty()
	}
}
