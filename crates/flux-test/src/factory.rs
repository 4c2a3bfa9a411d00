//! Record factory for building test records

use flux_core::{GridDescriptor, GridRow, Record, Uid};

/// Page records are placed on unless stated otherwise
pub const DEFAULT_PAGE: Uid = 1;

/// Builder for [`Record`] snapshots
#[derive(Debug, Clone)]
pub struct RecordFactory {
	record: Record,
}

impl RecordFactory {
	/// Start a default-language record on [`DEFAULT_PAGE`]
	pub fn new(uid: Uid) -> Self {
		Self {
			record: Record::new(uid, DEFAULT_PAGE),
		}
	}

	/// Place the record on a page
	pub fn on_page(mut self, pid: Uid) -> Self {
		self.record.pid = pid;
		self
	}

	/// Set `colPos`
	pub fn in_column(mut self, col_pos: i64) -> Self {
		self.record.col_pos = col_pos;
		self
	}

	/// Set `sorting`
	pub fn sorting(mut self, sorting: i64) -> Self {
		self.record.sorting = sorting;
		self
	}

	/// Set the language
	pub fn language(mut self, language: i64) -> Self {
		self.record.language = language;
		self
	}

	/// Make the record a translation of `parent`
	pub fn translating(mut self, parent: Uid) -> Self {
		self.record.translation_parent = parent;
		self
	}

	/// Attach a raw grid payload
	pub fn payload(mut self, payload: impl Into<String>) -> Self {
		self.record.grid_payload = Some(payload.into());
		self
	}

	/// Attach a JSON grid payload with one row per slice of local columns
	pub fn grid(self, rows: &[&[i64]]) -> Self {
		self.payload(grid_payload(rows))
	}

	/// Finish the record
	pub fn build(self) -> Record {
		self.record
	}
}

/// Grid descriptor with one row per slice of local columns
pub fn grid_descriptor(rows: &[&[i64]]) -> GridDescriptor {
	rows.iter().fold(GridDescriptor::new(), |grid, row| {
		grid.with_row(GridRow::with_columns(row.iter().copied()))
	})
}

/// JSON grid payload understood by `PayloadGridProvider`
pub fn grid_payload(rows: &[&[i64]]) -> String {
	serde_json::to_string(&grid_descriptor(rows)).unwrap_or_default()
}
