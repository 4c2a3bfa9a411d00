//! # Flux Conf
//!
//! Settings for the grid cascade engine, loaded from layered sources:
//! defaults, an optional TOML file and `FLUX_*` environment variables.
//!
//! ```
//! use flux_conf::{SettingsBuilder, sources::DefaultSource};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new().with_value("strict_errors", true.into()))
//!     .build()
//!     .unwrap();
//! assert!(settings.strict_errors);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod settings;
pub mod sources;

pub use builder::{SettingsBuilder, SettingsError};
pub use settings::{DEFAULT_CONTENT_TABLE, DEFAULT_GRID_FIELD, FluxSettings};
