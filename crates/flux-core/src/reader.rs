//! Grid descriptor reader
//!
//! Flattens the grid a record exposes into the virtual column numbers its
//! children are stored under.

use crate::Uid;
use crate::column;
use crate::exception::{FluxError, FluxResult};
use crate::grid::GridDescriptor;
use crate::provider::ProviderResolver;
use crate::record::Record;

/// Reads grids through a [`ProviderResolver`]
pub struct GridReader<'a> {
	resolver: &'a dyn ProviderResolver,
	field: &'a str,
	validate_addresses: bool,
}

impl<'a> GridReader<'a> {
	/// Create a reader resolving providers for the configuration `field`
	pub fn new(resolver: &'a dyn ProviderResolver, field: &'a str) -> Self {
		Self {
			resolver,
			field,
			validate_addresses: true,
		}
	}

	/// Reject local column numbers outside `0..=99` instead of encoding them
	pub fn with_address_validation(mut self, enabled: bool) -> Self {
		self.validate_addresses = enabled;
		self
	}

	/// Build the grid of `record`.
	///
	/// Returns `Ok(None)` when no provider resolves or the provider reports no
	/// grid. Provider failures are returned as [`FluxError::DescriptorBuild`].
	pub fn grid(&self, table: &str, record: &Record) -> FluxResult<Option<GridDescriptor>> {
		let Some(provider) = self
			.resolver
			.resolve_primary_provider(table, self.field, record)
		else {
			tracing::debug!(table, uid = record.uid, "no provider resolved, not a grid");
			return Ok(None);
		};

		provider
			.grid(record)
			.map_err(|e| FluxError::DescriptorBuild {
				provider: provider.name().to_string(),
				message: e.message().to_string(),
			})
	}

	/// Virtual column numbers owned by `record`, addressed against
	/// `address_base_uid`.
	///
	/// For translated records callers pass the translation root's uid since
	/// children address the default-language parent.
	pub fn child_virtual_columns(
		&self,
		table: &str,
		record: &Record,
		address_base_uid: Uid,
	) -> FluxResult<Vec<i64>> {
		let Some(grid) = self.grid(table, record)? else {
			return Ok(Vec::new());
		};

		grid.local_columns()
			.map(|local_column| {
				if self.validate_addresses {
					column::checked_encode(address_base_uid, local_column)
				} else {
					Ok(column::wrapping_encode(address_base_uid, local_column))
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::grid::GridRow;
	use crate::provider::{
		PayloadGridProvider, Provider, ProviderError, ProviderRegistration, ProviderRegistry,
		StaticGridProvider,
	};
	use rstest::rstest;
	use std::sync::Arc;

	struct FailingProvider;

	impl Provider for FailingProvider {
		fn name(&self) -> &str {
			"failing"
		}

		fn grid(&self, _record: &Record) -> Result<Option<GridDescriptor>, ProviderError> {
			Err(ProviderError::new("template missing"))
		}
	}

	fn registry_with(provider: Arc<dyn Provider>) -> ProviderRegistry {
		let mut registry = ProviderRegistry::new();
		registry.register(ProviderRegistration::new("tt_content", provider));
		registry
	}

	fn two_by_two() -> GridDescriptor {
		GridDescriptor::new()
			.with_row(GridRow::with_columns([0, 1]))
			.with_row(GridRow::with_columns([2, 3]))
	}

	#[rstest]
	fn test_two_rows_of_two_columns() {
		let registry = registry_with(Arc::new(StaticGridProvider::new("static", two_by_two())));
		let reader = GridReader::new(&registry, "pi_flexform");

		let columns = reader
			.child_virtual_columns("tt_content", &Record::new(7, 1), 7)
			.unwrap();

		assert_eq!(columns, vec![700, 701, 702, 703]);
	}

	#[rstest]
	fn test_address_base_overrides_record_uid() {
		let registry = registry_with(Arc::new(StaticGridProvider::new("static", two_by_two())));
		let reader = GridReader::new(&registry, "pi_flexform");

		let mut translation = Record::new(8, 1);
		translation.translation_parent = 7;

		let columns = reader
			.child_virtual_columns("tt_content", &translation, translation.translation_root_uid())
			.unwrap();

		assert_eq!(columns, vec![700, 701, 702, 703]);
	}

	#[rstest]
	fn test_no_provider_means_no_children() {
		let registry = ProviderRegistry::new();
		let reader = GridReader::new(&registry, "pi_flexform");

		let columns = reader
			.child_virtual_columns("tt_content", &Record::new(7, 1), 7)
			.unwrap();

		assert!(columns.is_empty());
	}

	#[rstest]
	fn test_provider_without_grid_means_no_children() {
		let registry = registry_with(Arc::new(PayloadGridProvider::new()));
		let reader = GridReader::new(&registry, "pi_flexform");

		let columns = reader
			.child_virtual_columns("tt_content", &Record::new(7, 1), 7)
			.unwrap();

		assert!(columns.is_empty());
	}

	#[rstest]
	fn test_provider_failure_propagates() {
		let registry = registry_with(Arc::new(FailingProvider));
		let reader = GridReader::new(&registry, "pi_flexform");

		let err = reader
			.child_virtual_columns("tt_content", &Record::new(7, 1), 7)
			.unwrap_err();

		match err {
			FluxError::DescriptorBuild { provider, message } => {
				assert_eq!(provider, "failing");
				assert_eq!(message, "template missing");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_out_of_range_local_column() {
		let grid = GridDescriptor::new().with_row(GridRow::with_columns([0, 120]));
		let registry = registry_with(Arc::new(StaticGridProvider::new("static", grid)));

		let strict = GridReader::new(&registry, "pi_flexform");
		assert!(matches!(
			strict.child_virtual_columns("tt_content", &Record::new(7, 1), 7),
			Err(FluxError::Addressing(_))
		));

		let lenient = GridReader::new(&registry, "pi_flexform").with_address_validation(false);
		assert_eq!(
			lenient
				.child_virtual_columns("tt_content", &Record::new(7, 1), 7)
				.unwrap(),
			vec![700, 820]
		);
	}

	#[rstest]
	fn test_lenient_addressing_wraps_oversized_base() {
		let registry = registry_with(Arc::new(StaticGridProvider::new("static", two_by_two())));
		let reader = GridReader::new(&registry, "pi_flexform").with_address_validation(false);

		let columns = reader
			.child_virtual_columns("tt_content", &Record::new(7, 1), i64::MAX)
			.unwrap();

		assert_eq!(columns[1], i64::MAX.wrapping_mul(100).wrapping_add(1));

		let strict = GridReader::new(&registry, "pi_flexform");
		assert!(matches!(
			strict.child_virtual_columns("tt_content", &Record::new(7, 1), i64::MAX),
			Err(FluxError::Addressing(_))
		));
	}
}
