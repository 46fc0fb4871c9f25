//! Response shortcuts.

use crate::template::TemplateRenderer;
use hyper::StatusCode;
use serde::Serialize;
use tera::Context;
use visitcard_http::{Response, Result};

/// Render `template` as a 200 HTML response
pub fn render(renderer: &TemplateRenderer, template: &str, context: &Context) -> Result<Response> {
	render_with_status(renderer, template, context, StatusCode::OK)
}

pub fn render_with_status(
	renderer: &TemplateRenderer,
	template: &str,
	context: &Context,
	status: StatusCode,
) -> Result<Response> {
	let html = renderer.render(template, context)?;
	let mut response = Response::html(html);
	response.status = status;
	Ok(response)
}

/// 302 redirect to `location`
///
/// # Examples
///
/// ```
/// use visitcard_shortcuts::redirect;
///
/// let response = redirect("/request/");
/// assert_eq!(response.status.as_u16(), 302);
/// assert_eq!(response.location(), Some("/request/"));
/// ```
pub fn redirect(location: &str) -> Response {
	Response::temporary_redirect(location)
}

/// 200 response with `data` serialized as JSON
pub fn render_json<T: Serialize>(data: &T) -> Result<Response> {
	Response::ok().with_json(data)
}

/// Plain text body, as used for AJAX acknowledgements
pub fn render_text(body: impl Into<String>) -> Response {
	Response::ok()
		.with_content_type("text/plain; charset=utf-8")
		.with_body(body.into())
}
