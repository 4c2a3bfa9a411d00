//! Grid descriptors
//!
//! A grid is a declarative layout of rows and columns a content record exposes
//! so other records can be placed inside it. Descriptors are derived from a
//! record's grid payload on demand and are never persisted by Flux.

use serde::{Deserialize, Serialize};

/// Layout of a grid: ordered rows of ordered columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDescriptor {
	/// Rows in display order
	#[serde(default)]
	pub rows: Vec<GridRow>,
}

/// A grid row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
	/// Columns in display order
	#[serde(default)]
	pub columns: Vec<GridColumn>,
}

/// A grid column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridColumn {
	/// Local column number, `0..=99`
	#[serde(rename = "colPos")]
	pub local_column: i64,

	/// Optional column name used by templates
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl GridDescriptor {
	/// Create an empty grid
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a row
	pub fn add_row(&mut self, row: GridRow) -> &mut Self {
		self.rows.push(row);
		self
	}

	/// Builder-style [`add_row`](Self::add_row)
	pub fn with_row(mut self, row: GridRow) -> Self {
		self.rows.push(row);
		self
	}

	/// Whether the grid declares no columns at all
	pub fn is_empty(&self) -> bool {
		self.rows.iter().all(|row| row.columns.is_empty())
	}

	/// Local column numbers, row order first, then column order
	pub fn local_columns(&self) -> impl Iterator<Item = i64> + '_ {
		self.rows
			.iter()
			.flat_map(|row| row.columns.iter().map(|column| column.local_column))
	}

	/// Number of declared columns
	pub fn column_count(&self) -> usize {
		self.rows.iter().map(|row| row.columns.len()).sum()
	}
}

impl GridRow {
	/// Create an empty row
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a row of unnamed columns
	pub fn with_columns(local_columns: impl IntoIterator<Item = i64>) -> Self {
		Self {
			columns: local_columns.into_iter().map(GridColumn::new).collect(),
		}
	}

	/// Append a column
	pub fn add_column(&mut self, column: GridColumn) -> &mut Self {
		self.columns.push(column);
		self
	}
}

impl GridColumn {
	/// Create an unnamed column
	pub fn new(local_column: i64) -> Self {
		Self {
			local_column,
			name: None,
		}
	}

	/// Attach a name
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_local_columns_follow_row_then_column_order() {
		let grid = GridDescriptor::new()
			.with_row(GridRow::with_columns([2, 0]))
			.with_row(GridRow::with_columns([3, 1]));

		assert_eq!(grid.local_columns().collect::<Vec<_>>(), vec![2, 0, 3, 1]);
		assert_eq!(grid.column_count(), 4);
	}

	#[rstest]
	fn test_empty_grid() {
		assert!(GridDescriptor::new().is_empty());
		assert!(
			GridDescriptor::new()
				.with_row(GridRow::new())
				.with_row(GridRow::new())
				.is_empty()
		);
		assert!(
			!GridDescriptor::new()
				.with_row(GridRow::with_columns([0]))
				.is_empty()
		);
	}

	#[rstest]
	fn test_deserialize_from_json() {
		let grid: GridDescriptor = serde_json::from_value(json!({
			"rows": [
				{"columns": [{"colPos": 0, "name": "left"}, {"colPos": 1}]},
				{"columns": []}
			]
		}))
		.unwrap();

		assert_eq!(grid.rows.len(), 2);
		assert_eq!(grid.rows[0].columns[0].name.as_deref(), Some("left"));
		assert_eq!(grid.local_columns().collect::<Vec<_>>(), vec![0, 1]);
	}
}
