//! # Flux
//!
//! Nested content grids for page-tree CMS records.
//!
//! A grid-bearing record declares a layout of rows and columns. Records nested
//! in those columns address their parent through a *virtual column number*
//! stored in the host's flat `colPos` field. This crate keeps that nesting
//! consistent while the host deletes, copies or translates records.
//!
//! ## Crates
//!
//! - `flux-core`: virtual column codec, grid descriptors, providers and the grid reader
//! - `flux-conf`: layered [`FluxSettings`](conf::FluxSettings)
//! - `flux-cascade`: cascade engine, host hook adapter and localization collector
//! - `flux-test`: in-memory store and fixtures (`test-utils` feature)
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything except testing utilities
//! - `cascade` - record cascades and host hooks
//! - `test-utils` - testing utilities
//!
//! ## Example
//!
//! ```rust,ignore
//! use flux::prelude::*;
//!
//! let settings = SettingsBuilder::standard("flux.toml").build()?;
//! let mut registry = ProviderRegistry::new();
//! registry.register(ProviderRegistration::new("tt_content", Arc::new(PayloadGridProvider::new())));
//!
//! let hook = DataHandlerHook::new(&store, &store, &registry, &settings);
//! let mut request = RequestContext::new();
//! hook.process_cmdmap_pre_process(&mut request, "tt_content", 7, "delete", &json!(1))?;
//! ```

pub use flux_core as core;

pub use flux_conf as conf;

#[cfg(feature = "cascade")]
pub use flux_cascade as cascade;

#[cfg(feature = "test-utils")]
pub use flux_test as test;

pub use flux_conf::{FluxSettings, SettingsBuilder};
pub use flux_core::{
	FluxError, FluxResult, GridColumn, GridDescriptor, GridReader, GridRow, Record,
	RecordOverrides, Uid, column,
};

#[cfg(feature = "cascade")]
pub use flux_cascade::{
	CascadeCommand, CascadeEngine, CascadeReport, CommandContext, DataHandlerHook,
	LocalizationCollector, RecordMutator, RecordQuery, RecordStore, RequestContext,
};

/// Commonly used items
pub mod prelude {
	pub use flux_conf::sources::ConfigSource;
	pub use flux_conf::{FluxSettings, SettingsBuilder};
	pub use flux_core::{
		FluxError, FluxResult, GridDescriptor, GridReader, PayloadGridProvider, Provider,
		ProviderRegistration, ProviderRegistry, ProviderResolver, Record, RecordOverrides,
		StaticGridProvider, Uid, column,
	};

	#[cfg(feature = "cascade")]
	pub use flux_cascade::prelude::*;
}
