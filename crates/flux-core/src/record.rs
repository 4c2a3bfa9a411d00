//! Content record snapshots
//!
//! Records are owned by the host's record store. Flux only reads snapshots of
//! the handful of fields it needs and hands typed override values back to the
//! host's mutation primitives. Field names follow the host schema so adapters
//! can convert with `serde_json` directly.

use crate::Uid;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Host field names consumed or written by Flux
pub mod fields {
	/// Record identifier
	pub const UID: &str = "uid";
	/// Page the record lives on
	pub const PID: &str = "pid";
	/// Column position, raw or virtual
	pub const COL_POS: &str = "colPos";
	/// Sort order within a column
	pub const SORTING: &str = "sorting";
	/// Language of the record
	pub const LANGUAGE: &str = "sys_language_uid";
	/// Default-language record this record translates
	pub const TRANSLATION_PARENT: &str = "l18n_parent";
	/// Record this record was copied from into another language
	pub const TRANSLATION_SOURCE: &str = "l10n_source";
	/// Provenance of copies
	pub const ORIGINAL_UID: &str = "t3_origuid";
	/// Grid configuration payload
	pub const GRID_PAYLOAD: &str = "pi_flexform";
	/// Resolved parent record of a nested child
	pub const PARENT: &str = "tx_flux_parent";
}

/// Snapshot of a content record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
	/// Record identifier
	pub uid: Uid,

	/// Page id
	pub pid: Uid,

	/// Column position (`colPos`)
	#[serde(rename = "colPos", default)]
	pub col_pos: i64,

	/// Sort order
	#[serde(default)]
	pub sorting: i64,

	/// Language id (`sys_language_uid`)
	#[serde(rename = "sys_language_uid", default)]
	pub language: i64,

	/// Translation parent (`l18n_parent`), 0 for originals
	#[serde(rename = "l18n_parent", default)]
	pub translation_parent: Uid,

	/// Translation source (`l10n_source`)
	#[serde(rename = "l10n_source", default)]
	pub translation_source: Uid,

	/// Uid this record was copied from (`t3_origuid`)
	#[serde(rename = "t3_origuid", default)]
	pub original_uid: Uid,

	/// Opaque grid configuration payload (`pi_flexform`)
	#[serde(rename = "pi_flexform", default, skip_serializing_if = "Option::is_none")]
	pub grid_payload: Option<String>,
}

impl Record {
	/// Create a default-language record on a page
	pub fn new(uid: Uid, pid: Uid) -> Self {
		Self {
			uid,
			pid,
			..Self::default()
		}
	}

	/// Build a record from a host row
	pub fn from_row(row: JsonValue) -> serde_json::Result<Self> {
		serde_json::from_value(row)
	}

	/// Whether the record carries a non-empty grid payload
	pub fn has_grid_payload(&self) -> bool {
		self.grid_payload
			.as_deref()
			.is_some_and(|payload| !payload.trim().is_empty())
	}

	/// Whether the record is a translation of another record
	pub fn is_translation(&self) -> bool {
		self.translation_parent > 0
	}

	/// Uid that nested children address themselves against.
	///
	/// Children of a translated grid keep pointing at the default-language
	/// parent, so a translation resolves to its translation parent.
	pub fn translation_root_uid(&self) -> Uid {
		if self.is_translation() {
			self.translation_parent
		} else {
			self.uid
		}
	}
}

/// Field values forced onto a copied or localized record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOverrides {
	/// New column position
	#[serde(rename = "colPos", skip_serializing_if = "Option::is_none")]
	pub col_pos: Option<i64>,

	/// New language id
	#[serde(rename = "sys_language_uid", skip_serializing_if = "Option::is_none")]
	pub language: Option<i64>,

	/// New translation parent
	#[serde(rename = "l18n_parent", skip_serializing_if = "Option::is_none")]
	pub translation_parent: Option<Uid>,

	/// New translation source
	#[serde(rename = "l10n_source", skip_serializing_if = "Option::is_none")]
	pub translation_source: Option<Uid>,

	/// Provenance
	#[serde(rename = "t3_origuid", skip_serializing_if = "Option::is_none")]
	pub original_uid: Option<Uid>,
}

impl RecordOverrides {
	/// Create an empty override set
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the column position
	pub fn with_col_pos(mut self, col_pos: i64) -> Self {
		self.col_pos = Some(col_pos);
		self
	}

	/// Set the language
	pub fn with_language(mut self, language: i64) -> Self {
		self.language = Some(language);
		self
	}

	/// Set the translation parent
	pub fn with_translation_parent(mut self, uid: Uid) -> Self {
		self.translation_parent = Some(uid);
		self
	}

	/// Set the translation source
	pub fn with_translation_source(mut self, uid: Uid) -> Self {
		self.translation_source = Some(uid);
		self
	}

	/// Set the original uid
	pub fn with_original_uid(mut self, uid: Uid) -> Self {
		self.original_uid = Some(uid);
		self
	}

	/// Whether no field is overridden
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Convert into a host field map, leaving out unset fields
	pub fn to_field_map(&self) -> Map<String, JsonValue> {
		let mut map = Map::new();
		if let Some(value) = self.col_pos {
			map.insert(fields::COL_POS.to_string(), value.into());
		}
		if let Some(value) = self.language {
			map.insert(fields::LANGUAGE.to_string(), value.into());
		}
		if let Some(value) = self.translation_parent {
			map.insert(fields::TRANSLATION_PARENT.to_string(), value.into());
		}
		if let Some(value) = self.translation_source {
			map.insert(fields::TRANSLATION_SOURCE.to_string(), value.into());
		}
		if let Some(value) = self.original_uid {
			map.insert(fields::ORIGINAL_UID.to_string(), value.into());
		}
		map
	}

	/// Apply the overrides to a record snapshot
	pub fn apply_to(&self, record: &mut Record) {
		if let Some(value) = self.col_pos {
			record.col_pos = value;
		}
		if let Some(value) = self.language {
			record.language = value;
		}
		if let Some(value) = self.translation_parent {
			record.translation_parent = value;
		}
		if let Some(value) = self.translation_source {
			record.translation_source = value;
		}
		if let Some(value) = self.original_uid {
			record.original_uid = value;
		}
	}
}
