//! Host lifecycle hook adapter
//!
//! Maps the host's command-map and data-map callbacks onto the cascade
//! engine. Everything a hook needs from the surrounding request travels in an
//! explicit [`RequestContext`] owned by the caller; the adapter itself keeps no
//! state between calls.

use crate::command::{CascadeCommand, CommandContext, json_to_i64, names};
use crate::context::CascadeReport;
use crate::engine::CascadeEngine;
use crate::ports::{RecordMutator, RecordQuery, RecordStore};
use flux_conf::FluxSettings;
use flux_core::{FluxResult, ProviderResolver, Uid, column, fields};
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeMap, HashMap};

type FieldMap = Map<String, JsonValue>;

/// State of one host request (one editor action)
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
	copy_mapping: HashMap<String, HashMap<Uid, Uid>>,
	commands: HashMap<(String, Uid), BTreeMap<String, JsonValue>>,
	data: HashMap<(String, Uid), FieldMap>,
	caches_cleared: bool,
}

impl RequestContext {
	/// Start a request
	pub fn new() -> Self {
		Self::default()
	}

	/// Record that the host copied `old` to `new`
	pub fn record_copy(&mut self, table: &str, old: Uid, new: Uid) {
		self.copy_mapping
			.entry(table.to_string())
			.or_default()
			.insert(old, new);
	}

	/// Uid of the copy made from `uid`
	pub fn copy_of(&self, table: &str, uid: Uid) -> Option<Uid> {
		self.copy_mapping.get(table)?.get(&uid).copied()
	}

	/// Copy mapping of `table`
	pub fn copy_mapping(&self, table: &str) -> HashMap<Uid, Uid> {
		self.copy_mapping.get(table).cloned().unwrap_or_default()
	}

	/// Register a command submitted in this request
	pub fn add_command(
		&mut self,
		table: &str,
		uid: Uid,
		name: impl Into<String>,
		value: JsonValue,
	) {
		self.commands
			.entry((table.to_string(), uid))
			.or_default()
			.insert(name.into(), value);
	}

	/// Whether the request carries command `name` for a record
	pub fn has_command(&self, table: &str, uid: Uid, name: &str) -> bool {
		self.commands
			.get(&(table.to_string(), uid))
			.is_some_and(|commands| commands.contains_key(name))
	}

	/// Register field values submitted in this request
	pub fn add_data(&mut self, table: &str, uid: Uid, values: FieldMap) {
		self.data
			.entry((table.to_string(), uid))
			.or_default()
			.extend(values);
	}

	/// Field values submitted for a record
	pub fn data_for(&self, table: &str, uid: Uid) -> Option<&FieldMap> {
		self.data.get(&(table.to_string(), uid))
	}

	/// Whether page caches were already cleared in this request
	pub fn caches_cleared(&self) -> bool {
		self.caches_cleared
	}
}

/// Adapter between host hooks and the cascade engine
pub struct DataHandlerHook<'a> {
	store: &'a dyn RecordStore,
	mutator: &'a dyn RecordMutator,
	engine: CascadeEngine<'a>,
	settings: &'a FluxSettings,
}

impl<'a> DataHandlerHook<'a> {
	/// Create the adapter
	pub fn new(
		store: &'a dyn RecordStore,
		mutator: &'a dyn RecordMutator,
		resolver: &'a dyn ProviderResolver,
		settings: &'a FluxSettings,
	) -> Self {
		Self {
			store,
			mutator,
			engine: CascadeEngine::new(store, mutator, resolver, settings),
			settings,
		}
	}

	/// Called before the host executes a command. Runs the delete cascade.
	pub fn process_cmdmap_pre_process(
		&self,
		request: &mut RequestContext,
		table: &str,
		uid: Uid,
		command: &str,
		value: &JsonValue,
	) -> FluxResult<Option<CascadeReport>> {
		match CascadeCommand::from_host(command, value)? {
			Some(CascadeCommand::Delete) => {
				let ctx = CommandContext::new(CascadeCommand::Delete, table, uid);
				self.run(request, &ctx).map(Some)
			}
			_ => Ok(None),
		}
	}

	/// Called after the host executed a command. Runs copy and language
	/// cascades; the host must have recorded the subject's copy in `request`.
	pub fn process_cmdmap_post_process(
		&self,
		request: &mut RequestContext,
		table: &str,
		uid: Uid,
		command: &str,
		value: &JsonValue,
	) -> FluxResult<Option<CascadeReport>> {
		match CascadeCommand::from_host(command, value)? {
			Some(cascade) if !cascade.is_pre_process() => {
				let ctx = CommandContext::new(cascade, table, uid)
					.with_copy_mapping(request.copy_mapping(table));
				let report = self.run(request, &ctx)?;
				for (old, new) in &report.created {
					request.record_copy(table, *old, *new);
				}
				Ok(Some(report))
			}
			_ => Ok(None),
		}
	}

	fn run(&self, request: &mut RequestContext, ctx: &CommandContext) -> FluxResult<CascadeReport> {
		let report = self.engine.execute(ctx)?;
		if report.is_noop() || request.caches_cleared {
			return Ok(report);
		}
		if let Some(pid) = report.subject_pid {
			self.mutator.clear_page_cache(pid)?;
			request.caches_cleared = true;
		}
		Ok(report)
	}

	/// Called for every record the host is about to write.
	///
	/// Fills in the parent reference of nested records and, for translations
	/// whose translation parent is being moved in the same request, the column
	/// position the move assigns.
	pub fn process_datamap_post_process_field_array(
		&self,
		request: &RequestContext,
		table: &str,
		uid: Option<Uid>,
		field_array: &mut FieldMap,
	) -> FluxResult<()> {
		// New records have no uid yet.
		let Some(uid) = uid else {
			return Ok(());
		};
		if !self.settings.is_grid_table(table) {
			return Ok(());
		}
		let Some(record) = self.store.get_single(table, uid)? else {
			return Ok(());
		};

		if record.is_translation()
			&& !field_array.contains_key(fields::COL_POS)
			&& request.has_command(table, record.translation_parent, names::MOVE)
		{
			let col_pos = request
				.data_for(table, record.translation_parent)
				.and_then(|data| data.get(fields::COL_POS))
				.and_then(json_to_i64)
				.unwrap_or(0);
			tracing::debug!(table, uid, col_pos, "back-filled colPos from moved translation parent");
			field_array.insert(fields::COL_POS.to_string(), col_pos.into());
		}

		let Some(col_pos) = field_array.get(fields::COL_POS).and_then(json_to_i64) else {
			return Ok(());
		};
		let parent_uid = if column::is_virtual(col_pos) {
			column::decode_parent(col_pos)
		} else {
			0
		};

		let parent = if record.language == 0 || parent_uid == 0 {
			parent_uid
		} else {
			let query = RecordQuery::new()
				.translating(parent_uid)
				.in_language(record.language);
			self.store
				.find(table, &query)?
				.first()
				.map(|translated_parent| translated_parent.uid)
				.unwrap_or(0)
		};
		field_array.insert(fields::PARENT.to_string(), parent.into());
		Ok(())
	}
}
