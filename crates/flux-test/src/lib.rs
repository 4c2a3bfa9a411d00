//! # Flux Test
//!
//! Testing utilities for grid cascades.
//!
//! ## Modules
//!
//! - `memory`: in-memory record store journaling every mutation
//! - `factory`: record builder and grid payload helpers
//! - `providers`: provider doubles and ready-made registries
//! - `logging`: test logging setup and log capture
//! - `fixtures`: rstest fixtures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flux_test::prelude::*;
//!
//! #[rstest]
//! fn test_delete(nested_store: InMemoryStore, registry: ProviderRegistry, settings: FluxSettings) {
//!     // ...
//! }
//! ```

pub mod factory;
pub mod fixtures;
pub mod logging;
pub mod memory;
pub mod providers;

pub use factory::{RecordFactory, grid_descriptor, grid_payload};
pub use logging::{LogCapture, init_test_logging};
pub use memory::{InMemoryStore, Mutation, TOP_SORTING};
pub use providers::{CONTENT_TABLE, FailingProvider, failing_registry, payload_registry};

/// Re-export commonly used testing utilities
pub mod prelude {
	pub use crate::factory::*;
	pub use crate::fixtures::*;
	pub use crate::logging::*;
	pub use crate::memory::*;
	pub use crate::providers::*;
	pub use flux_conf::FluxSettings;
	pub use flux_core::{ProviderRegistry, Record, RecordOverrides, Uid};
	pub use rstest::*;
}
