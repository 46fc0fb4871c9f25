//! Login and logout views.

use crate::state::AppState;
use crate::views::{base_context, view};
use hyper::Method;
use visitcard_auth::{AuthError, authenticate, login, logout, safe_redirect_target};
use visitcard_forms::{CharField, Form};
use visitcard_http::{Request, Response, Result};
use visitcard_shortcuts::{redirect, render};
use visitcard_urls::{Router, UrlResult};

pub const APP_LABEL: &str = "auth";

pub fn login_form() -> Form {
	Form::new()
		.with_field(CharField::new("username").required().with_max_length(150))
		.with_field(CharField::new("password").required().password())
}

/// `GET/POST /login/`
pub async fn login_view(state: AppState, request: Request) -> Result<Response> {
	let mut form = login_form();
	let mut next = request.query_param("next");

	if request.method == Method::POST {
		let data = request.form_data().await?;
		if let Some(value) = data.get("next").filter(|value| !value.is_empty()) {
			next = Some(value.to_string());
		}
		form.bind(&data);
		if form.is_valid() {
			let username = form.get_str("username").unwrap_or_default();
			let password = form.get_str("password").unwrap_or_default();
			match authenticate(&state.db, username, password).await {
				Ok(mut user) => {
					login(&request, &state.db, &mut user).await?;
					return Ok(redirect(safe_redirect_target(next.as_deref())));
				}
				Err(e @ (AuthError::InvalidCredentials | AuthError::Inactive)) => {
					form.add_error(None, e.to_string());
				}
				Err(e) => return Err(e.into()),
			}
		}
	}

	let mut context = base_context(&state, &request);
	context.insert("form", &form.context());
	context.insert("next", &next);
	render(&state.templates, "registration/login.html", &context)
}

/// `GET /logout/`
pub async fn logout_view(_state: AppState, request: Request) -> Result<Response> {
	logout(&request);
	Ok(redirect("/"))
}

pub fn urlpatterns(state: &AppState) -> UrlResult<Router> {
	Router::new()
		.route("/login/", view(state, login_view), "login")?
		.route("/logout/", view(state, logout_view), "logout")
}
