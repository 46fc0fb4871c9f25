//! # visitcard
//!
//! A personal profile site: one editable "About" profile, a log of every
//! HTTP request with an adjustable priority, and an audit trail written by
//! model signals.
//!
//! The crate wires the framework crates together:
//!
//! - [`apps`]: the `hello` profile app and the login/logout views
//! - [`admin`]: a staff-only admin for the profile, request and audit models
//! - [`urls`]: the root URL configuration
//! - [`management`]: the `manage` command line (`runserver`, `migrate`,
//!   `count_objects`, `createsuperuser`)
//!
//! ```rust,no_run
//! use visitcard::{build_handler, load_templates, setup_database, AppState};
//! use visitcard_conf::Settings;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let db = setup_database(&settings).await?;
//! db.migrate().await?;
//! let state = AppState::new(db, load_templates(&settings)?, settings);
//! let handler = build_handler(&state)?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod apps;
pub mod management;
pub mod state;
pub mod urls;
pub mod views;

pub use state::AppState;

use apps::hello::RequestLoggingMiddleware;
use std::sync::Arc;
use visitcard_auth::{AuthenticationMiddleware, SessionConfig, SessionMiddleware};
use visitcard_conf::Settings;
use visitcard_db::{Database, DbResult};
use visitcard_http::{Handler, MiddlewareChain};
use visitcard_shortcuts::{TemplateError, TemplateRenderer};
use visitcard_urls::UrlResult;

/// Connect to the configured database, register the installed models and
/// run the app startup hooks
pub async fn setup_database(settings: &Settings) -> DbResult<Database> {
	let db = Database::connect(&settings.database_url, settings.database_max_connections).await?;
	apps::register_models(&db);
	apps::ready(&db);
	Ok(db)
}

pub fn load_templates(settings: &Settings) -> Result<TemplateRenderer, TemplateError> {
	TemplateRenderer::from_dir(&settings.templates_dir)
}

/// The router wrapped in the site middleware, outermost first: sessions,
/// authentication, then the request logger
pub fn build_handler(state: &AppState) -> UrlResult<Arc<dyn Handler>> {
	let router = urls::urlpatterns(state)?;
	let settings = &state.settings;

	let session = SessionConfig::new(settings.session_cookie_name.as_str(), settings.session_ttl())
		.with_secure(settings.session_cookie_secure);
	let chain = MiddlewareChain::new(Arc::new(router))
		.with_middleware(Arc::new(SessionMiddleware::new(session)))
		.with_middleware(Arc::new(AuthenticationMiddleware::new(state.db.clone())))
		.with_middleware(Arc::new(
			RequestLoggingMiddleware::new(state.db.clone())
				.with_exclude(settings.request_log_exclude.iter().cloned()),
		));

	Ok(Arc::new(chain))
}
