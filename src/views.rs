//! Glue between async view functions and the handler pipeline.
//!
//! Views are plain `async fn(AppState, Request) -> Result<Response>`;
//! [`view`] turns one into a [`Handler`] the router can dispatch to.

use crate::state::AppState;
use async_trait::async_trait;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use visitcard_auth::{LoginRequired, auth_state};
use visitcard_http::{Handler, Request, Response, Result};
use visitcard_shortcuts::serve_file;
use visitcard_shortcuts::tera::Context;

type ViewFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;
type ViewFn = Arc<dyn Fn(AppState, Request) -> ViewFuture + Send + Sync>;

/// A view function bound to the application state
pub struct View {
	state: AppState,
	view: ViewFn,
}

#[async_trait]
impl Handler for View {
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.view)(self.state.clone(), request).await
	}
}

pub fn view<F, Fut>(state: &AppState, f: F) -> Arc<dyn Handler>
where
	F: Fn(AppState, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Arc::new(View {
		state: state.clone(),
		view: Arc::new(move |state, request| Box::pin(f(state, request))),
	})
}

/// Redirect anonymous users to the configured login page
pub fn login_required(state: &AppState, handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
	Arc::new(LoginRequired::new(handler).with_login_url(state.settings.login_url.as_str()))
}

/// Like [`login_required`], and answer 403 to authenticated non-staff users
pub fn staff_member_required(state: &AppState, handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
	Arc::new(
		LoginRequired::new(handler)
			.with_login_url(state.settings.login_url.as_str())
			.staff_only(),
	)
}

/// Template context every page starts from: the current user and the
/// static and media URL prefixes
pub fn base_context(state: &AppState, request: &Request) -> Context {
	let auth = auth_state(request);
	let mut context = Context::new();
	context.insert(
		"user",
		&json!({
			"is_authenticated": auth.is_authenticated(),
			"username": auth.username,
			"is_staff": auth.is_staff,
		}),
	);
	context.insert("static_url", &state.settings.static_url);
	context.insert("media_url", &state.settings.media_url);
	context.insert("path", request.path());
	context
}

pub async fn serve_media(state: AppState, request: Request) -> Result<Response> {
	let path = request.path_param("path").unwrap_or_default();
	serve_file(&state.settings.media_root, path).await
}

pub async fn serve_static(state: AppState, request: Request) -> Result<Response> {
	let path = request.path_param("path").unwrap_or_default();
	serve_file(&state.settings.static_root, path).await
}
