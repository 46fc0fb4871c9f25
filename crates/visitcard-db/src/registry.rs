//! Installed models, grouped by app.

use crate::Model;
use indexmap::IndexMap;
use parking_lot::RwLock;
use sea_query::TableCreateStatement;
use std::sync::Arc;

/// Static description of a registered model
#[derive(Debug, Clone, Copy)]
pub struct ModelInfo {
	pub app_label: &'static str,
	pub name: &'static str,
	pub table: &'static str,
	create_table: fn() -> TableCreateStatement,
}

impl ModelInfo {
	pub fn of<M: Model>(app_label: &'static str) -> Self {
		Self {
			app_label,
			name: M::MODEL_NAME,
			table: M::TABLE_NAME,
			create_table: M::create_table,
		}
	}

	pub fn create_table_statement(&self) -> TableCreateStatement {
		(self.create_table)()
	}
}

/// Ordered set of installed models, keyed by table name.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
	models: Arc<RwLock<IndexMap<&'static str, ModelInfo>>>,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `M` under `app_label`; registering again replaces the entry
	pub fn register<M: Model>(&self, app_label: &'static str) {
		let info = ModelInfo::of::<M>(app_label);
		tracing::debug!(app = app_label, model = info.name, "registered model");
		self.models.write().insert(info.table, info);
	}

	/// Models in registration order
	pub fn models(&self) -> Vec<ModelInfo> {
		self.models.read().values().copied().collect()
	}

	/// Look a model up by name, ignoring case (`signaldata` finds `SignalData`)
	pub fn get(&self, name: &str) -> Option<ModelInfo> {
		self.models
			.read()
			.values()
			.find(|info| info.name.eq_ignore_ascii_case(name))
			.copied()
	}

	pub fn len(&self) -> usize {
		self.models.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.models.read().is_empty()
	}
}
