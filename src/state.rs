use std::sync::Arc;
use visitcard_conf::Settings;
use visitcard_db::Database;
use visitcard_shortcuts::TemplateRenderer;

/// Everything a view needs; cheap to clone
#[derive(Clone, Debug)]
pub struct AppState {
	pub db: Database,
	pub templates: TemplateRenderer,
	pub settings: Arc<Settings>,
}

impl AppState {
	pub fn new(db: Database, templates: TemplateRenderer, settings: Settings) -> Self {
		Self {
			db,
			templates,
			settings: Arc::new(settings),
		}
	}
}
