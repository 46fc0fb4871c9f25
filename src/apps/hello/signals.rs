//! Audit trail receivers.
//!
//! Every save or delete made through the ORM is recorded as a
//! [`SignalData`] row, except changes to `SignalData` itself.

use super::models::SignalData;
use std::fmt;
use std::sync::Arc;
use visitcard_core::signals::SignalError;
use visitcard_db::{Database, Model, PostDelete, PostSave};

pub const AUDIT_POST_SAVE_UID: &str = "audit_post_save";
pub const AUDIT_POST_DELETE_UID: &str = "audit_post_delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
	Create,
	Update,
	Delete,
}

impl fmt::Display for AuditAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			AuditAction::Create => "Create",
			AuditAction::Update => "Update",
			AuditAction::Delete => "Delete",
		})
	}
}

/// Audit text for one change
///
/// # Examples
///
/// ```
/// use visitcard::apps::hello::signals::{AuditAction, audit_message};
///
/// assert_eq!(
///     audit_message(AuditAction::Update, Some(3), "AllRequest"),
///     "Update row with id 3 in AllRequest"
/// );
/// assert_eq!(
///     audit_message(AuditAction::Delete, None, "About"),
///     "Delete row with id None in About"
/// );
/// ```
pub fn audit_message(action: AuditAction, id: Option<i64>, model_name: &str) -> String {
	let id = id.map_or_else(|| "None".to_string(), |id| id.to_string());
	format!("{action} row with id {id} in {model_name}")
}

async fn record(
	db: &Database,
	action: AuditAction,
	id: Option<i64>,
	model_name: &str,
) -> Result<(), SignalError> {
	if model_name == SignalData::MODEL_NAME {
		return Ok(());
	}
	let message = audit_message(action, id, model_name);
	db.objects::<SignalData>()
		.create(SignalData::new(message.as_str()))
		.await
		.map_err(|e| SignalError::new(format!("failed to write audit row: {e}")))?;
	tracing::debug!(%message, "audit row written");
	Ok(())
}

/// Connect the audit receivers to `db`'s model signals.
///
/// Connecting twice replaces the earlier receivers.
pub fn connect_audit_receivers(db: &Database) {
	db.signals().post_save.connect_with_options(
		|event: Arc<PostSave>| async move {
			let action = if event.created {
				AuditAction::Create
			} else {
				AuditAction::Update
			};
			record(&event.db, action, event.instance_id, event.model_name).await
		},
		Some(AUDIT_POST_SAVE_UID.to_string()),
		0,
	);
	db.signals().post_delete.connect_with_options(
		|event: Arc<PostDelete>| async move {
			record(
				&event.db,
				AuditAction::Delete,
				event.instance_id,
				event.model_name,
			)
			.await
		},
		Some(AUDIT_POST_DELETE_UID.to_string()),
		0,
	);
}
