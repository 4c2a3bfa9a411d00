//! rstest fixtures
//!
//! The nested fixture mirrors a typical page: record 7 on page 1 holds a 2x2
//! grid (local columns 0 to 3) with three children in virtual column 701,
//! sorted 10, 20, 30 as uids 11, 12, 13.

use crate::factory::RecordFactory;
use crate::memory::InMemoryStore;
use crate::providers::{CONTENT_TABLE, payload_registry};
use flux_conf::FluxSettings;
use flux_core::{ProviderRegistry, Uid};
use rstest::fixture;

/// Uid of the grid-bearing record in [`nested_store`]
pub const GRID_UID: Uid = 7;

/// Children of [`GRID_UID`] in ascending `sorting`
pub const CHILD_UIDS: [Uid; 3] = [11, 12, 13];

/// Default settings
#[fixture]
pub fn settings() -> FluxSettings {
	FluxSettings::default()
}

/// Settings with strict errors on
#[fixture]
pub fn strict_settings() -> FluxSettings {
	FluxSettings::default().with_strict_errors(true)
}

/// Registry reading grids from record payloads
#[fixture]
pub fn registry() -> ProviderRegistry {
	payload_registry()
}

/// Empty store
#[fixture]
pub fn store() -> InMemoryStore {
	InMemoryStore::new()
}

/// Store holding a grid record with three children
#[fixture]
pub fn nested_store() -> InMemoryStore {
	let store = InMemoryStore::new();
	store.insert(
		CONTENT_TABLE,
		RecordFactory::new(GRID_UID)
			.sorting(100)
			.grid(&[&[0, 1], &[2, 3]])
			.build(),
	);
	for (index, uid) in CHILD_UIDS.iter().enumerate() {
		store.insert(
			CONTENT_TABLE,
			RecordFactory::new(*uid)
				.in_column(701)
				.sorting(10 * (index as i64 + 1))
				.build(),
		);
	}
	store
}
