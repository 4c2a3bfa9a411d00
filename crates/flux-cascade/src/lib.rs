//! # Flux Cascade
//!
//! Keeps nested grid content consistent when the host deletes, copies or
//! translates a grid-bearing record.
//!
//! ## Architecture
//!
//! ```text
//! flux-cascade
//! ├── ports         - record store and mutation ports implemented by the host
//! ├── command       - host commands and per-invocation command context
//! ├── context       - cascade state and reports
//! ├── engine        - delete / copy / localize cascades
//! ├── hooks         - host hook adapter and per-request state
//! └── localization  - records offered when translating a column
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flux_cascade::prelude::*;
//!
//! let hook = DataHandlerHook::new(&store, &store, &registry, &settings);
//! let mut request = RequestContext::new();
//!
//! // before the host deletes record 7
//! hook.process_cmdmap_pre_process(&mut request, "tt_content", 7, "delete", &json!(1))?;
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod context;
pub mod engine;
pub mod hooks;
pub mod localization;
pub mod ports;

pub mod prelude {
	//! Convenient re-exports of commonly used items

	pub use crate::command::{CascadeCommand, CommandContext};
	pub use crate::context::{CascadeContext, CascadeReport};
	pub use crate::engine::CascadeEngine;
	pub use crate::hooks::{DataHandlerHook, RequestContext};
	pub use crate::localization::LocalizationCollector;
	pub use crate::ports::{RecordMutator, RecordQuery, RecordStore, SortOrder};
}

pub use command::{CascadeCommand, CommandContext};
pub use context::{CascadeContext, CascadeReport};
pub use engine::CascadeEngine;
pub use hooks::{DataHandlerHook, RequestContext};
pub use localization::LocalizationCollector;
pub use ports::{RecordMutator, RecordQuery, RecordStore, SortOrder};
