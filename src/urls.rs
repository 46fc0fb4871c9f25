//! Root URL configuration.

use crate::admin;
use crate::apps::{accounts, hello};
use crate::state::AppState;
use crate::views::{serve_media, serve_static, view};
use visitcard_urls::{Router, UrlResult};

fn file_route(prefix: &str) -> String {
	format!("/{}/{{path:*}}", prefix.trim_matches('/'))
}

/// Every route of the site: the profile app, login and logout, the admin,
/// and the media and static files
pub fn urlpatterns(state: &AppState) -> UrlResult<Router> {
	Router::new()
		.include("/", None, hello::urls::urlpatterns(state)?)?
		.include("/", None, accounts::urlpatterns(state)?)?
		.include("/admin/", Some("admin"), admin::urlpatterns(state, admin::default_site())?)?
		.route(
			&file_route(&state.settings.media_url),
			view(state, serve_media),
			"media",
		)?
		.route(
			&file_route(&state.settings.static_url),
			view(state, serve_static),
			"static",
		)
}
