//! Records offered for translation
//!
//! When an editor translates a page column, the host lists the records of
//! that column. Grid children live in virtual columns and would be missed, so
//! the collector adds the nested children of every grid-bearing record.

use crate::engine::child_columns_or_skip;
use crate::ports::{RecordQuery, RecordStore, SortOrder};
use flux_conf::FluxSettings;
use flux_core::{FluxResult, ProviderResolver, Record, Uid};
use std::collections::HashSet;

/// Collects the records to copy when a column is translated
pub struct LocalizationCollector<'a> {
	store: &'a dyn RecordStore,
	resolver: &'a dyn ProviderResolver,
	settings: &'a FluxSettings,
}

impl<'a> LocalizationCollector<'a> {
	/// Create a collector
	pub fn new(
		store: &'a dyn RecordStore,
		resolver: &'a dyn ProviderResolver,
		settings: &'a FluxSettings,
	) -> Self {
		Self {
			store,
			resolver,
			settings,
		}
	}

	/// Records in `col_pos` of page `page_id` written in `language` that are
	/// not yet translated into `dest_language`, plus their nested grid
	/// children, ordered by `sorting`.
	pub fn records_to_copy(
		&self,
		table: &str,
		page_id: Uid,
		col_pos: i64,
		dest_language: i64,
		language: i64,
	) -> FluxResult<Vec<Record>> {
		let base = self.store.find(
			table,
			&RecordQuery::new()
				.on_page(page_id)
				.in_columns([col_pos])
				.in_language(language)
				.order_by_sorting(SortOrder::Ascending),
		)?;

		let mut uids = Vec::new();
		let mut visited = HashSet::new();
		for record in base {
			self.collect(table, page_id, dest_language, record, &mut uids, &mut visited)?;
		}

		if uids.is_empty() {
			return Ok(Vec::new());
		}
		tracing::debug!(table, page_id, col_pos, records = uids.len(), "collected records to localize");
		self.store.find(
			table,
			&RecordQuery::new()
				.with_uids(uids)
				.order_by_sorting(SortOrder::Ascending),
		)
	}

	fn collect(
		&self,
		table: &str,
		page_id: Uid,
		dest_language: i64,
		record: Record,
		uids: &mut Vec<Uid>,
		visited: &mut HashSet<Uid>,
	) -> FluxResult<()> {
		if !visited.insert(record.uid) || self.is_translated(table, &record, dest_language)? {
			return Ok(());
		}
		uids.push(record.uid);

		if !record.has_grid_payload() {
			return Ok(());
		}
		let mut skipped = None;
		let Some(columns) = child_columns_or_skip(
			self.resolver,
			self.settings,
			table,
			&record,
			record.uid,
			&mut skipped,
		)?
		else {
			return Ok(());
		};
		if columns.is_empty() {
			return Ok(());
		}

		let children = self.store.find(
			table,
			&RecordQuery::new()
				.on_page(page_id)
				.in_columns(columns)
				.in_language(record.language)
				.order_by_sorting(SortOrder::Ascending),
		)?;
		for child in children {
			self.collect(table, page_id, dest_language, child, uids, visited)?;
		}
		Ok(())
	}

	fn is_translated(&self, table: &str, record: &Record, dest_language: i64) -> FluxResult<bool> {
		let translations = self.store.find(
			table,
			&RecordQuery::new()
				.translating(record.uid)
				.in_language(dest_language),
		)?;
		Ok(!translations.is_empty())
	}
}
