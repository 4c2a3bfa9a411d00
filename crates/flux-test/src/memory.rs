//! In-memory record store
//!
//! Implements both host ports over a map of tables and journals every
//! mutation so tests can assert on the exact order in which a cascade issued
//! them. Copies and translations are placed at the top of their destination
//! column, like the host does.

use flux_cascade::ports::{RecordMutator, RecordQuery, RecordStore, SortOrder};
use flux_core::{FluxError, FluxResult, Record, RecordOverrides, Uid};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// Sorting given to the first record placed in an empty column
pub const TOP_SORTING: i64 = 256;

/// A mutation issued through [`RecordMutator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
	/// `delete(table, uid)`
	Delete {
		/// Table
		table: String,
		/// Deleted uid
		uid: Uid,
	},
	/// `copy_record(table, uid, destination_pid, overrides)`
	Copy {
		/// Table
		table: String,
		/// Copied uid
		uid: Uid,
		/// Destination page
		destination_pid: Uid,
		/// Overrides passed by the caller
		overrides: RecordOverrides,
		/// Uid of the copy
		new_uid: Uid,
	},
	/// `localize(table, uid, language, overrides)`
	Localize {
		/// Table
		table: String,
		/// Translated uid
		uid: Uid,
		/// Target language
		language: i64,
		/// Overrides passed by the caller
		overrides: RecordOverrides,
		/// Uid of the translation
		new_uid: Uid,
	},
	/// `clear_page_cache(pid)`
	ClearPageCache {
		/// Page
		pid: Uid,
	},
}

impl Mutation {
	/// Uid the mutation was issued for; `None` for cache clears
	pub fn subject(&self) -> Option<Uid> {
		match self {
			Self::Delete { uid, .. } | Self::Copy { uid, .. } | Self::Localize { uid, .. } => {
				Some(*uid)
			}
			Self::ClearPageCache { .. } => None,
		}
	}
}

#[derive(Debug, Default)]
struct State {
	tables: HashMap<String, BTreeMap<Uid, Record>>,
	next_uid: Uid,
	journal: Vec<Mutation>,
	fail_on: Option<Uid>,
}

/// Record store backed by memory
#[derive(Debug)]
pub struct InMemoryStore {
	state: Mutex<State>,
}

impl Default for InMemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryStore {
	/// Create an empty store; generated uids start at 1000
	pub fn new() -> Self {
		Self {
			state: Mutex::new(State {
				next_uid: 1000,
				..State::default()
			}),
		}
	}

	/// Insert or replace a record
	pub fn insert(&self, table: &str, record: Record) -> &Self {
		let mut state = self.state.lock();
		state
			.tables
			.entry(table.to_string())
			.or_default()
			.insert(record.uid, record);
		self
	}

	/// Insert several records
	pub fn insert_all(&self, table: &str, records: impl IntoIterator<Item = Record>) -> &Self {
		for record in records {
			self.insert(table, record);
		}
		self
	}

	/// Snapshot of one record
	pub fn get(&self, table: &str, uid: Uid) -> Option<Record> {
		self.state.lock().tables.get(table)?.get(&uid).cloned()
	}

	/// Snapshot of a table, by uid
	pub fn records(&self, table: &str) -> Vec<Record> {
		self.state
			.lock()
			.tables
			.get(table)
			.map(|records| records.values().cloned().collect())
			.unwrap_or_default()
	}

	/// Mutations issued so far
	pub fn journal(&self) -> Vec<Mutation> {
		self.state.lock().journal.clone()
	}

	/// Uids of the issued mutations, in order, cache clears left out
	pub fn mutated_uids(&self) -> Vec<Uid> {
		self.journal().iter().filter_map(Mutation::subject).collect()
	}

	/// Forget the journal
	pub fn clear_journal(&self) {
		self.state.lock().journal.clear();
	}

	/// Make every mutation of `uid` fail with [`FluxError::Store`]
	pub fn fail_on(&self, uid: Uid) {
		self.state.lock().fail_on = Some(uid);
	}

	fn check_failure(state: &State, uid: Uid) -> FluxResult<()> {
		if state.fail_on == Some(uid) {
			return Err(FluxError::Store(format!("simulated failure for uid {}", uid)));
		}
		Ok(())
	}

	/// Place `record` at the top of its column and store it under a new uid
	fn insert_at_top(state: &mut State, table: &str, mut record: Record) -> Uid {
		state.next_uid += 1;
		record.uid = state.next_uid;
		let rows = state.tables.entry(table.to_string()).or_default();
		record.sorting = rows
			.values()
			.filter(|other| {
				other.pid == record.pid
					&& other.col_pos == record.col_pos
					&& other.language == record.language
			})
			.map(|other| other.sorting - 1)
			.min()
			.unwrap_or(TOP_SORTING);
		let uid = record.uid;
		rows.insert(uid, record);
		uid
	}
}

impl RecordStore for InMemoryStore {
	fn get_single(&self, table: &str, uid: Uid) -> FluxResult<Option<Record>> {
		Ok(self.get(table, uid))
	}

	fn find(&self, table: &str, query: &RecordQuery) -> FluxResult<Vec<Record>> {
		let mut records: Vec<Record> = self
			.records(table)
			.into_iter()
			.filter(|record| query.matches(record))
			.collect();
		match query.order {
			Some(SortOrder::Ascending) => records.sort_by_key(|r| (r.sorting, r.uid)),
			Some(SortOrder::Descending) => {
				records.sort_by_key(|r| (std::cmp::Reverse(r.sorting), r.uid))
			}
			None => {}
		}
		Ok(records)
	}
}

impl RecordMutator for InMemoryStore {
	fn delete(&self, table: &str, uid: Uid) -> FluxResult<()> {
		let mut state = self.state.lock();
		Self::check_failure(&state, uid)?;
		state
			.tables
			.get_mut(table)
			.and_then(|rows| rows.remove(&uid))
			.ok_or_else(|| FluxError::not_found(table, uid))?;
		state.journal.push(Mutation::Delete {
			table: table.to_string(),
			uid,
		});
		Ok(())
	}

	fn copy_record(
		&self,
		table: &str,
		uid: Uid,
		destination_pid: Uid,
		overrides: &RecordOverrides,
	) -> FluxResult<Uid> {
		let mut state = self.state.lock();
		Self::check_failure(&state, uid)?;
		let mut copy = state
			.tables
			.get(table)
			.and_then(|rows| rows.get(&uid))
			.cloned()
			.ok_or_else(|| FluxError::not_found(table, uid))?;
		copy.pid = destination_pid;
		overrides.apply_to(&mut copy);

		let new_uid = Self::insert_at_top(&mut state, table, copy);
		state.journal.push(Mutation::Copy {
			table: table.to_string(),
			uid,
			destination_pid,
			overrides: overrides.clone(),
			new_uid,
		});
		Ok(new_uid)
	}

	fn localize(
		&self,
		table: &str,
		uid: Uid,
		language: i64,
		overrides: &RecordOverrides,
	) -> FluxResult<Uid> {
		let mut state = self.state.lock();
		Self::check_failure(&state, uid)?;
		let mut translation = state
			.tables
			.get(table)
			.and_then(|rows| rows.get(&uid))
			.cloned()
			.ok_or_else(|| FluxError::not_found(table, uid))?;
		translation.language = language;
		translation.translation_parent = uid;
		overrides.apply_to(&mut translation);

		let new_uid = Self::insert_at_top(&mut state, table, translation);
		state.journal.push(Mutation::Localize {
			table: table.to_string(),
			uid,
			language,
			overrides: overrides.clone(),
			new_uid,
		});
		Ok(new_uid)
	}

	fn clear_page_cache(&self, pid: Uid) -> FluxResult<()> {
		self.state.lock().journal.push(Mutation::ClearPageCache { pid });
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory::RecordFactory;

	#[test]
	fn test_find_orders_by_sorting() {
		let store = InMemoryStore::new();
		store.insert_all(
			"tt_content",
			[
				RecordFactory::new(1).sorting(20).build(),
				RecordFactory::new(2).sorting(10).build(),
				RecordFactory::new(3).sorting(30).build(),
			],
		);

		let asc = store
			.find(
				"tt_content",
				&RecordQuery::new().order_by_sorting(SortOrder::Ascending),
			)
			.unwrap();
		let desc = store
			.find(
				"tt_content",
				&RecordQuery::new().order_by_sorting(SortOrder::Descending),
			)
			.unwrap();

		assert_eq!(asc.iter().map(|r| r.uid).collect::<Vec<_>>(), vec![2, 1, 3]);
		assert_eq!(desc.iter().map(|r| r.uid).collect::<Vec<_>>(), vec![3, 1, 2]);
	}

	#[test]
	fn test_copies_go_to_top_of_column() {
		let store = InMemoryStore::new();
		store.insert("tt_content", RecordFactory::new(1).in_column(701).build());

		let first = store
			.copy_record("tt_content", 1, 5, &RecordOverrides::new().with_col_pos(4201))
			.unwrap();
		let second = store
			.copy_record("tt_content", 1, 5, &RecordOverrides::new().with_col_pos(4201))
			.unwrap();

		assert_eq!(store.get("tt_content", first).unwrap().sorting, TOP_SORTING);
		assert_eq!(
			store.get("tt_content", second).unwrap().sorting,
			TOP_SORTING - 1
		);
		assert_eq!(store.get("tt_content", second).unwrap().pid, 5);
	}

	#[test]
	fn test_localize_links_translation_parent() {
		let store = InMemoryStore::new();
		store.insert("tt_content", RecordFactory::new(1).build());

		let uid = store
			.localize("tt_content", 1, 2, &RecordOverrides::new())
			.unwrap();

		let translation = store.get("tt_content", uid).unwrap();
		assert_eq!(translation.language, 2);
		assert_eq!(translation.translation_parent, 1);
	}

	#[test]
	fn test_failure_injection() {
		let store = InMemoryStore::new();
		store.insert("tt_content", RecordFactory::new(1).build());
		store.fail_on(1);

		assert!(matches!(
			store.delete("tt_content", 1),
			Err(FluxError::Store(_))
		));
		assert!(store.get("tt_content", 1).is_some());
		assert!(store.journal().is_empty());
	}
}
