//! Installed apps.

pub mod accounts;
pub mod hello;

use visitcard_auth::User;
use visitcard_db::Database;

/// Register every installed model, in display order
pub fn register_models(db: &Database) {
	db.registry().register::<User>(accounts::APP_LABEL);
	db.registry().register::<hello::About>(hello::APP_LABEL);
	db.registry().register::<hello::AllRequest>(hello::APP_LABEL);
	db.registry().register::<hello::SignalData>(hello::APP_LABEL);
}

/// App startup hooks: connect the audit receivers
pub fn ready(db: &Database) {
	hello::signals::connect_audit_receivers(db);
}
