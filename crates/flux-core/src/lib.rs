//! # Flux Core
//!
//! Addressing and grid primitives for nested content.
//!
//! Content records can expose a *grid*: rows of columns other records are
//! placed into. Children of a grid store a virtual column number in the host's
//! `colPos` field that packs the parent uid and a local column number.
//!
//! ## Architecture
//!
//! ```text
//! flux-core
//! ├── column    - virtual column number codec
//! ├── record    - record snapshots and override values
//! ├── grid      - grid descriptors (rows -> columns)
//! ├── provider  - provider capability, registry, built-in providers
//! └── reader    - flattens a record's grid into child virtual columns
//! ```

#![warn(missing_docs)]

pub mod column;
pub mod exception;
pub mod grid;
pub mod provider;
pub mod reader;
pub mod record;

/// Record identifier
pub type Uid = i64;

pub use exception::{FluxError, FluxResult};
pub use grid::{GridColumn, GridDescriptor, GridRow};
pub use provider::{
	PayloadGridProvider, Provider, ProviderError, ProviderRegistration, ProviderRegistry,
	ProviderResolver, StaticGridProvider,
};
pub use reader::GridReader;
pub use record::{Record, RecordOverrides, fields};
