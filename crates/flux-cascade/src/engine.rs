//! Record cascade engine
//!
//! Propagates delete, copy and localize commands from a grid-bearing record to
//! the records nested in its grid columns.
//!
//! Children are always fetched in descending `sorting`. The host inserts every
//! copy at the top of its destination column, so processing the last child
//! first leaves the copies in the original ascending order. On delete the
//! children go before the subject so none is left pointing at a missing parent.
//!
//! The engine holds no state between invocations and issues no rollback: a
//! failing mutation port aborts the cascade and leaves earlier mutations in
//! place.

use crate::command::{CascadeCommand, CommandContext};
use crate::context::{CascadeContext, CascadeReport};
use crate::ports::{RecordMutator, RecordQuery, RecordStore, SortOrder};
use flux_conf::FluxSettings;
use flux_core::{
	FluxError, FluxResult, GridReader, ProviderResolver, Record, RecordOverrides, Uid, column,
};

/// How children are duplicated under the new parent
#[derive(Debug, Clone, Copy)]
enum CopyMode {
	/// Same-language copy, no translation linkage
	Copy,
	/// Language copy linked through the translation source
	CopyToLanguage(i64),
	/// Translation linked through the translation parent
	Localize(i64),
}

/// Runs cascades against the host ports
pub struct CascadeEngine<'a> {
	store: &'a dyn RecordStore,
	mutator: &'a dyn RecordMutator,
	resolver: &'a dyn ProviderResolver,
	settings: &'a FluxSettings,
}

impl<'a> CascadeEngine<'a> {
	/// Create an engine
	pub fn new(
		store: &'a dyn RecordStore,
		mutator: &'a dyn RecordMutator,
		resolver: &'a dyn ProviderResolver,
		settings: &'a FluxSettings,
	) -> Self {
		Self {
			store,
			mutator,
			resolver,
			settings,
		}
	}

	/// Settings in use
	pub fn settings(&self) -> &FluxSettings {
		self.settings
	}

	/// Run the cascade for `ctx`.
	///
	/// `Delete` must be executed before the host deletes the subject; the
	/// copy and language commands after the host has created the subject's copy
	/// and recorded it in the copy mapping.
	pub fn execute(&self, ctx: &CommandContext) -> FluxResult<CascadeReport> {
		let mut report = CascadeReport::new(ctx.uid);
		if !self.settings.is_grid_table(&ctx.table) {
			tracing::debug!(table = %ctx.table, "table has no grids, cascade skipped");
			return Ok(report);
		}

		let Some(cascade) = self.prepare(ctx, &mut report)? else {
			return Ok(report);
		};

		match ctx.command {
			CascadeCommand::Delete => self.cascade_delete(&cascade, &mut report)?,
			CascadeCommand::Copy => {
				self.cascade_copy(ctx, CopyMode::Copy, &cascade, &mut report)?
			}
			CascadeCommand::CopyToLanguage { language } => self.cascade_copy(
				ctx,
				CopyMode::CopyToLanguage(language),
				&cascade,
				&mut report,
			)?,
			CascadeCommand::Localize { language } => {
				self.cascade_copy(ctx, CopyMode::Localize(language), &cascade, &mut report)?
			}
		}

		tracing::info!(
			command = %ctx.command,
			table = %ctx.table,
			uid = ctx.uid,
			deleted = report.deleted.len(),
			created = report.created.len(),
			"grid cascade finished"
		);
		Ok(report)
	}

	/// Delete the children of `uid` ahead of the subject's own delete
	pub fn pre_delete(&self, table: &str, uid: Uid) -> FluxResult<CascadeReport> {
		self.execute(&CommandContext::new(CascadeCommand::Delete, table, uid))
	}

	/// Load the subject, its translation root and its children
	fn prepare(
		&self,
		ctx: &CommandContext,
		report: &mut CascadeReport,
	) -> FluxResult<Option<CascadeContext>> {
		let Some(subject) = self.store.get_single(&ctx.table, ctx.uid)? else {
			tracing::debug!(table = %ctx.table, uid = ctx.uid, "subject not found, cascade skipped");
			return Ok(None);
		};
		report.subject_pid = Some(subject.pid);

		if !subject.has_grid_payload() {
			return Ok(None);
		}

		let translation_root = subject.translation_root_uid();
		let Some(child_columns) = child_columns_or_skip(
			self.resolver,
			self.settings,
			&ctx.table,
			&subject,
			translation_root,
			&mut report.skipped_error,
		)?
		else {
			return Ok(None);
		};
		if child_columns.is_empty() {
			return Ok(None);
		}

		let query = RecordQuery::new()
			.in_columns(child_columns.iter().copied())
			.in_language(subject.language)
			.order_by_sorting(SortOrder::Descending);
		let children = self.store.find(&ctx.table, &query)?;
		tracing::debug!(
			table = %ctx.table,
			uid = subject.uid,
			translation_root,
			columns = ?child_columns,
			children = children.len(),
			"resolved grid children"
		);

		Ok(Some(CascadeContext {
			command: ctx.command,
			table: ctx.table.clone(),
			subject,
			translation_root,
			child_columns,
			children,
		}))
	}

	fn cascade_delete(
		&self,
		cascade: &CascadeContext,
		report: &mut CascadeReport,
	) -> FluxResult<()> {
		for child in &cascade.children {
			tracing::debug!(table = %cascade.table, uid = child.uid, "deleting grid child");
			self.mutator.delete(&cascade.table, child.uid)?;
			report.deleted.push(child.uid);
		}
		Ok(())
	}

	fn cascade_copy(
		&self,
		ctx: &CommandContext,
		mode: CopyMode,
		cascade: &CascadeContext,
		report: &mut CascadeReport,
	) -> FluxResult<()> {
		if cascade.children.is_empty() {
			return Ok(());
		}
		let Some(new_parent_uid) = ctx.copy_of(cascade.subject.uid) else {
			tracing::warn!(
				command = %ctx.command,
				table = %ctx.table,
				uid = cascade.subject.uid,
				"no copy recorded for subject, children not copied"
			);
			return Ok(());
		};
		let new_parent = self
			.store
			.get_single(&ctx.table, new_parent_uid)?
			.ok_or_else(|| FluxError::not_found(ctx.table.as_str(), new_parent_uid))?;

		// Translations share their original's children addressing, so localized
		// children stay under the translation root. Copies stand alone.
		let address_base = match mode {
			CopyMode::Localize(_) => cascade.translation_root,
			CopyMode::Copy | CopyMode::CopyToLanguage(_) => new_parent_uid,
		};
		for child in &cascade.children {
			let col_pos = self.reparent(child, address_base)?;
			let new_uid = match mode {
				CopyMode::Copy => {
					let overrides = RecordOverrides::new().with_col_pos(col_pos);
					self.mutator
						.copy_record(&ctx.table, child.uid, new_parent.pid, &overrides)?
				}
				CopyMode::CopyToLanguage(language) => {
					let overrides = language_overrides(child, col_pos, language)
						.with_translation_source(translation_link(child));
					self.mutator
						.copy_record(&ctx.table, child.uid, new_parent.pid, &overrides)?
				}
				CopyMode::Localize(language) => {
					let overrides = language_overrides(child, col_pos, language)
						.with_translation_parent(translation_link(child));
					self.mutator
						.localize(&ctx.table, child.uid, language, &overrides)?
				}
			};
			tracing::debug!(
				command = %ctx.command,
				table = %ctx.table,
				uid = child.uid,
				new_uid,
				col_pos,
				"copied grid child"
			);
			report.created.push((child.uid, new_uid));
		}
		Ok(())
	}

	fn reparent(&self, child: &Record, address_base: Uid) -> FluxResult<i64> {
		let local_column = column::decode_local(child.col_pos);
		if self.settings.validate_addresses {
			column::checked_encode(address_base, local_column)
		} else {
			Ok(column::reparent(child.col_pos, address_base))
		}
	}
}

/// Translation linkage for a copied child: chain to the child's own original
/// when it already is a translation, to the child itself otherwise.
fn translation_link(child: &Record) -> Uid {
	if child.is_translation() {
		child.translation_parent
	} else {
		child.uid
	}
}

fn language_overrides(child: &Record, col_pos: i64, language: i64) -> RecordOverrides {
	RecordOverrides::new()
		.with_col_pos(col_pos)
		.with_language(language)
		.with_original_uid(child.uid)
}

/// Child virtual columns of `record`, applying the strict-errors policy.
///
/// Provider failures and grids declaring unaddressable columns are both
/// descriptor problems. Returns `Ok(None)` when one was swallowed; the failure
/// is stored in `skipped`.
pub(crate) fn child_columns_or_skip(
	resolver: &dyn ProviderResolver,
	settings: &FluxSettings,
	table: &str,
	record: &Record,
	address_base_uid: Uid,
	skipped: &mut Option<String>,
) -> FluxResult<Option<Vec<i64>>> {
	let reader = GridReader::new(resolver, &settings.grid_field)
		.with_address_validation(settings.validate_addresses);
	match reader.child_virtual_columns(table, record, address_base_uid) {
		Ok(columns) => Ok(Some(columns)),
		Err(err @ (FluxError::DescriptorBuild { .. } | FluxError::Addressing(_)))
			if !settings.strict_errors =>
		{
			tracing::warn!(
				table,
				uid = record.uid,
				error = %err,
				"grid descriptor failed, cascade skipped"
			);
			*skipped = Some(err.to_string());
			Ok(None)
		}
		Err(err) => Err(err),
	}
}
