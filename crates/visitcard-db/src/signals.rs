//! Model lifecycle signals.
//!
//! Every [`Database`](crate::Database) owns one [`ModelSignals`] pair;
//! clones of the database share it. `post_save` fires after each
//! insert/update made through [`Manager::save`](crate::Manager::save) and
//! `post_delete` after each [`Manager::delete`](crate::Manager::delete).
//! Bulk queryset deletes do not fire signals.

use crate::Database;
use std::fmt;
use visitcard_core::signals::{Signal, SignalName};

/// Sent after a model instance was written
#[derive(Clone)]
pub struct PostSave {
	/// Model name as shown to users (`About`, `AllRequest`, ...)
	pub model_name: &'static str,
	pub instance_id: Option<i64>,
	/// `true` when the row was inserted, `false` on update
	pub created: bool,
	/// Handle for receivers that write back to the database
	pub db: Database,
}

/// Sent after a model instance was deleted
#[derive(Clone)]
pub struct PostDelete {
	pub model_name: &'static str,
	pub instance_id: Option<i64>,
	pub db: Database,
}

impl fmt::Debug for PostSave {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PostSave")
			.field("model_name", &self.model_name)
			.field("instance_id", &self.instance_id)
			.field("created", &self.created)
			.finish()
	}
}

impl fmt::Debug for PostDelete {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PostDelete")
			.field("model_name", &self.model_name)
			.field("instance_id", &self.instance_id)
			.finish()
	}
}

/// The signals a database emits for model changes
#[derive(Clone, Debug)]
pub struct ModelSignals {
	pub post_save: Signal<PostSave>,
	pub post_delete: Signal<PostDelete>,
}

impl ModelSignals {
	pub fn new() -> Self {
		Self {
			post_save: Signal::new(SignalName::POST_SAVE),
			post_delete: Signal::new(SignalName::POST_DELETE),
		}
	}
}

impl Default for ModelSignals {
	fn default() -> Self {
		Self::new()
	}
}
