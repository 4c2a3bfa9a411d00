//! Delete cascade integration tests

use flux_cascade::prelude::*;
use flux_core::FluxError;
use flux_test::prelude::*;
use std::sync::Arc;

fn delete(uid: Uid) -> CommandContext {
	CommandContext::new(CascadeCommand::Delete, CONTENT_TABLE, uid)
}

#[rstest]
fn test_children_deleted_before_subject_in_descending_sorting(
	nested_store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	// Arrange
	let engine = CascadeEngine::new(&nested_store, &nested_store, &registry, &settings);

	// Act
	let report = engine.execute(&delete(GRID_UID)).unwrap();

	// Assert
	assert_eq!(report.deleted, vec![13, 12, 11]);
	assert_eq!(nested_store.mutated_uids(), vec![13, 12, 11]);
	assert!(nested_store.get(CONTENT_TABLE, GRID_UID).is_some());
	assert_eq!(report.subject_pid, Some(1));
}

#[rstest]
fn test_record_without_grid_is_left_alone(
	nested_store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	let engine = CascadeEngine::new(&nested_store, &nested_store, &registry, &settings);

	let report = engine.pre_delete(CONTENT_TABLE, 11).unwrap();

	assert!(report.is_noop());
	assert!(nested_store.journal().is_empty());
}

#[rstest]
fn test_missing_subject_is_noop(
	store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	let engine = CascadeEngine::new(&store, &store, &registry, &settings);

	let report = engine.execute(&delete(404)).unwrap();

	assert!(report.is_noop());
	assert_eq!(report.subject_pid, None);
}

#[rstest]
fn test_other_tables_are_ignored(registry: ProviderRegistry, settings: FluxSettings) {
	let store = InMemoryStore::new();
	store.insert("pages", RecordFactory::new(7).grid(&[&[0]]).build());
	store.insert("pages", RecordFactory::new(8).in_column(700).build());
	let engine = CascadeEngine::new(&store, &store, &registry, &settings);

	let report = engine
		.execute(&CommandContext::new(CascadeCommand::Delete, "pages", 7))
		.unwrap();

	assert!(report.is_noop());
	assert!(store.journal().is_empty());
}

#[rstest]
fn test_children_in_other_languages_are_kept(
	nested_store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	nested_store.insert(
		CONTENT_TABLE,
		RecordFactory::new(21)
			.in_column(701)
			.language(1)
			.translating(11)
			.build(),
	);
	let engine = CascadeEngine::new(&nested_store, &nested_store, &registry, &settings);

	let report = engine.execute(&delete(GRID_UID)).unwrap();

	assert_eq!(report.deleted, vec![13, 12, 11]);
	assert!(nested_store.get(CONTENT_TABLE, 21).is_some());
}

#[rstest]
fn test_translated_subject_resolves_children_through_translation_root(
	nested_store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	// Arrange: record 20 translates the grid, record 21 translates child 11
	nested_store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(20)
				.language(1)
				.translating(GRID_UID)
				.grid(&[&[0, 1], &[2, 3]])
				.build(),
			RecordFactory::new(21)
				.in_column(701)
				.language(1)
				.translating(11)
				.build(),
		],
	);
	let engine = CascadeEngine::new(&nested_store, &nested_store, &registry, &settings);

	// Act
	let report = engine.execute(&delete(20)).unwrap();

	// Assert
	assert_eq!(report.deleted, vec![21]);
	assert!(nested_store.get(CONTENT_TABLE, 11).is_some());
}

#[rstest]
fn test_descriptor_failure_is_logged_and_skipped(store: InMemoryStore, settings: FluxSettings) {
	// Arrange
	store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(GRID_UID).grid(&[&[1]]).build(),
			RecordFactory::new(11).in_column(701).build(),
		],
	);
	let provider = Arc::new(FailingProvider::new());
	let registry = failing_registry(Arc::clone(&provider));
	let engine = CascadeEngine::new(&store, &store, &registry, &settings);
	let capture = LogCapture::new();
	let _guard = capture.install();

	// Act
	let report = engine.execute(&delete(GRID_UID)).unwrap();

	// Assert
	assert!(report.is_noop());
	assert!(report.skipped_error.is_some());
	assert!(store.journal().is_empty());
	assert_eq!(provider.calls(), 1);
	assert!(capture.contains(tracing::Level::WARN, "grid descriptor failed"));
}

#[rstest]
fn test_descriptor_failure_propagates_in_strict_mode(
	store: InMemoryStore,
	strict_settings: FluxSettings,
) {
	store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(GRID_UID).grid(&[&[1]]).build(),
			RecordFactory::new(11).in_column(701).build(),
		],
	);
	let registry = failing_registry(Arc::new(FailingProvider::new()));
	let engine = CascadeEngine::new(&store, &store, &registry, &strict_settings);

	let result = engine.execute(&delete(GRID_UID));

	assert!(matches!(result, Err(FluxError::DescriptorBuild { .. })));
	assert!(store.journal().is_empty());
}

#[rstest]
fn test_failing_delete_leaves_earlier_deletes_in_place(
	nested_store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	// Arrange
	nested_store.fail_on(12);
	let engine = CascadeEngine::new(&nested_store, &nested_store, &registry, &settings);

	// Act
	let result = engine.execute(&delete(GRID_UID));

	// Assert
	assert!(matches!(result, Err(FluxError::Store(_))));
	assert_eq!(nested_store.mutated_uids(), vec![13]);
	assert!(nested_store.get(CONTENT_TABLE, 13).is_none());
	assert!(nested_store.get(CONTENT_TABLE, 12).is_some());
	assert!(nested_store.get(CONTENT_TABLE, 11).is_some());
}

#[rstest]
fn test_empty_grid_has_no_children(
	store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(GRID_UID).grid(&[]).build(),
			RecordFactory::new(11).in_column(701).build(),
		],
	);
	let engine = CascadeEngine::new(&store, &store, &registry, &settings);

	let report = engine.execute(&delete(GRID_UID)).unwrap();

	assert!(report.is_noop());
	assert!(store.get(CONTENT_TABLE, 11).is_some());
}

#[rstest]
fn test_unaddressable_grid_is_logged_and_skipped(
	store: InMemoryStore,
	registry: ProviderRegistry,
	settings: FluxSettings,
) {
	// Arrange: the grid declares a local column beyond 99
	store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(GRID_UID).grid(&[&[0, 120]]).build(),
			RecordFactory::new(11).in_column(700).build(),
		],
	);
	let engine = CascadeEngine::new(&store, &store, &registry, &settings);
	let capture = LogCapture::new();
	let _guard = capture.install();

	// Act
	let report = engine.execute(&delete(GRID_UID)).unwrap();

	// Assert
	assert!(report.is_noop());
	assert!(report.skipped_error.is_some());
	assert!(store.journal().is_empty());
	assert!(capture.contains(tracing::Level::WARN, "grid descriptor failed"));
}

#[rstest]
fn test_unaddressable_grid_fails_in_strict_mode(
	store: InMemoryStore,
	registry: ProviderRegistry,
	strict_settings: FluxSettings,
) {
	store.insert_all(
		CONTENT_TABLE,
		[
			RecordFactory::new(GRID_UID).grid(&[&[0, 120]]).build(),
			RecordFactory::new(11).in_column(700).build(),
		],
	);
	let engine = CascadeEngine::new(&store, &store, &registry, &strict_settings);

	let result = engine.execute(&delete(GRID_UID));

	assert!(matches!(result, Err(FluxError::Addressing(_))));
	assert!(store.journal().is_empty());
}
