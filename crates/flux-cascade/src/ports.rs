//! Record store and mutation ports
//!
//! The host owns record storage. Cascades read snapshots through
//! [`RecordStore`] and issue changes through [`RecordMutator`]; both calls are
//! blocking and assumed atomic.

use flux_core::{FluxResult, Record, RecordOverrides, Uid};
use serde::{Deserialize, Serialize};

/// Direction of the `sorting` order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending `sorting`
	Ascending,
	/// Descending `sorting`
	Descending,
}

/// Filter over a record table.
///
/// Unset criteria match everything. An empty `IN` list matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
	/// `pid = ?`
	pub pid: Option<Uid>,
	/// `sys_language_uid = ?`
	pub language: Option<i64>,
	/// `l18n_parent = ?`
	pub translation_parent: Option<Uid>,
	/// `colPos IN (...)`
	pub col_pos_in: Option<Vec<i64>>,
	/// `uid IN (...)`
	pub uid_in: Option<Vec<Uid>>,
	/// `ORDER BY sorting`
	pub order: Option<SortOrder>,
}

impl RecordQuery {
	/// Match every record
	pub fn new() -> Self {
		Self::default()
	}

	/// Restrict to a page
	pub fn on_page(mut self, pid: Uid) -> Self {
		self.pid = Some(pid);
		self
	}

	/// Restrict to a language
	pub fn in_language(mut self, language: i64) -> Self {
		self.language = Some(language);
		self
	}

	/// Restrict to translations of `uid`
	pub fn translating(mut self, uid: Uid) -> Self {
		self.translation_parent = Some(uid);
		self
	}

	/// Restrict to column positions
	pub fn in_columns(mut self, col_pos: impl IntoIterator<Item = i64>) -> Self {
		self.col_pos_in = Some(col_pos.into_iter().collect());
		self
	}

	/// Restrict to uids
	pub fn with_uids(mut self, uids: impl IntoIterator<Item = Uid>) -> Self {
		self.uid_in = Some(uids.into_iter().collect());
		self
	}

	/// Order by `sorting`
	pub fn order_by_sorting(mut self, order: SortOrder) -> Self {
		self.order = Some(order);
		self
	}

	/// Whether `record` satisfies every filter of this query
	pub fn matches(&self, record: &Record) -> bool {
		self.pid.is_none_or(|pid| record.pid == pid)
			&& self.language.is_none_or(|lang| record.language == lang)
			&& self
				.translation_parent
				.is_none_or(|parent| record.translation_parent == parent)
			&& self
				.col_pos_in
				.as_ref()
				.is_none_or(|cols| cols.contains(&record.col_pos))
			&& self
				.uid_in
				.as_ref()
				.is_none_or(|uids| uids.contains(&record.uid))
	}
}

/// Read access to the host's records
pub trait RecordStore: Send + Sync {
	/// Load one record, `None` when it does not exist
	fn get_single(&self, table: &str, uid: Uid) -> FluxResult<Option<Record>>;

	/// Load every record matching `query`, in the requested order
	fn find(&self, table: &str, query: &RecordQuery) -> FluxResult<Vec<Record>>;
}

/// Mutation primitives of the host
pub trait RecordMutator: Send + Sync {
	/// Delete a record
	fn delete(&self, table: &str, uid: Uid) -> FluxResult<()>;

	/// Copy a record to the top of `destination_pid`, forcing a new uid, and
	/// return the uid of the copy
	fn copy_record(
		&self,
		table: &str,
		uid: Uid,
		destination_pid: Uid,
		overrides: &RecordOverrides,
	) -> FluxResult<Uid>;

	/// Create a translation of a record in `language` and return its uid
	fn localize(
		&self,
		table: &str,
		uid: Uid,
		language: i64,
		overrides: &RecordOverrides,
	) -> FluxResult<Uid>;

	/// Flush the rendered cache of a page
	fn clear_page_cache(&self, _pid: Uid) -> FluxResult<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn child(uid: Uid, col_pos: i64, language: i64) -> Record {
		let mut record = Record::new(uid, 1);
		record.col_pos = col_pos;
		record.language = language;
		record
	}

	#[rstest]
	fn test_empty_query_matches_everything() {
		assert!(RecordQuery::new().matches(&child(1, 0, 0)));
	}

	#[rstest]
	fn test_column_and_language_filters() {
		let query = RecordQuery::new().in_columns([700, 701]).in_language(0);

		assert!(query.matches(&child(1, 701, 0)));
		assert!(!query.matches(&child(2, 702, 0)));
		assert!(!query.matches(&child(3, 700, 1)));
	}

	#[rstest]
	fn test_empty_in_list_matches_nothing() {
		let query = RecordQuery::new().in_columns(Vec::new());
		assert!(!query.matches(&child(1, 0, 0)));
	}

	#[rstest]
	fn test_page_uid_and_translation_filters() {
		let mut record = child(4, 0, 1);
		record.translation_parent = 2;

		assert!(RecordQuery::new().on_page(1).matches(&record));
		assert!(!RecordQuery::new().on_page(2).matches(&record));
		assert!(RecordQuery::new().with_uids([3, 4]).matches(&record));
		assert!(RecordQuery::new().translating(2).matches(&record));
		assert!(!RecordQuery::new().translating(3).matches(&record));
	}
}
