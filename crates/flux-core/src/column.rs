//! Virtual column number arithmetic
//!
//! Nested grid children share the host's flat `colPos` field with page-level
//! content. A child placed inside a grid stores a *virtual column number* that
//! packs the parent record's uid together with the local column number of the
//! grid column it lives in:
//!
//! ```text
//! virtual = parent_uid * MULTIPLIER + local_column
//! ```
//!
//! Page-level positions stay below [`MULTIPLIER`] and are used raw; they must
//! never be decoded with the functions in this module.
//!
//! ```
//! use flux_core::column;
//!
//! let virtual_column = column::encode(5, 3);
//! assert_eq!(virtual_column, 503);
//! assert_eq!(column::decode(virtual_column), (5, 3));
//! ```

use crate::Uid;
use crate::exception::{FluxError, FluxResult};

/// Factor applied to the parent uid. Bounds every grid level to 100 columns.
pub const MULTIPLIER: i64 = 100;

/// Highest local column number a grid column may declare.
pub const MAX_LOCAL_COLUMN: i64 = MULTIPLIER - 1;

/// Encode a parent uid and a local column number into a virtual column number.
///
/// `local_column` must lie in `0..=99`. Callers feed values taken from grid
/// descriptors; use [`checked_encode`] when the input is not already trusted.
pub fn encode(parent_uid: Uid, local_column: i64) -> i64 {
	debug_assert!(
		is_local_column(local_column),
		"local column {} out of range",
		local_column
	);
	parent_uid * MULTIPLIER + local_column
}

/// Encode after validating both components.
pub fn checked_encode(parent_uid: Uid, local_column: i64) -> FluxResult<i64> {
	if !is_local_column(local_column) {
		return Err(FluxError::Addressing(format!(
			"local column {} is outside 0..={}",
			local_column, MAX_LOCAL_COLUMN
		)));
	}
	if parent_uid < 0 {
		return Err(FluxError::Addressing(format!(
			"parent uid {} is negative",
			parent_uid
		)));
	}
	parent_uid
		.checked_mul(MULTIPLIER)
		.and_then(|base| base.checked_add(local_column))
		.ok_or_else(|| {
			FluxError::Addressing(format!("parent uid {} overflows colPos", parent_uid))
		})
}

/// Parent uid component (floor division).
pub fn decode_parent(virtual_column: i64) -> Uid {
	virtual_column.div_euclid(MULTIPLIER)
}

/// Local column component.
pub fn decode_local(virtual_column: i64) -> i64 {
	virtual_column.rem_euclid(MULTIPLIER)
}

/// Split a virtual column number into `(parent_uid, local_column)`.
pub fn decode(virtual_column: i64) -> (Uid, i64) {
	(decode_parent(virtual_column), decode_local(virtual_column))
}

/// Move a virtual column under another parent, keeping its local column.
///
/// Unchecked: a parent uid too large for `colPos` wraps. Use
/// [`checked_encode`] with [`decode_local`] to reject it instead.
pub fn reparent(virtual_column: i64, new_parent_uid: Uid) -> i64 {
	wrapping_encode(new_parent_uid, decode_local(virtual_column))
}

/// Encode without validation, wrapping on overflow.
pub fn wrapping_encode(parent_uid: Uid, local_column: i64) -> i64 {
	parent_uid
		.wrapping_mul(MULTIPLIER)
		.wrapping_add(local_column)
}

/// Whether `col_pos` addresses a nested grid column rather than a page column.
pub fn is_virtual(col_pos: i64) -> bool {
	col_pos >= MULTIPLIER
}

/// Whether `value` is a valid local column number.
pub fn is_local_column(value: i64) -> bool {
	(0..=MAX_LOCAL_COLUMN).contains(&value)
}
