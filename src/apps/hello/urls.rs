use super::views;
use crate::state::AppState;
use crate::views::{login_required, view};
use visitcard_urls::{Router, UrlResult};

pub fn urlpatterns(state: &AppState) -> UrlResult<Router> {
	Router::new()
		.route("/", view(state, views::about), "about")?
		.path("/about/", view(state, views::about))?
		.route("/request/", view(state, views::request_list), "request")?
		.route(
			"/request/ajax/",
			view(state, views::ajax_request_list),
			"ajax_request",
		)?
		.route(
			"/request/priority/{rank}/",
			view(state, views::priority),
			"priority",
		)?
		.route(
			"/request/edit/{pk:int}/",
			view(state, views::request_edit),
			"request_edit",
		)?
		.route(
			"/edit/{pk:int}/",
			login_required(state, view(state, views::edit_person)),
			"edit",
		)
}
