//! Access guards for views.

use crate::middleware::auth_state;
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use visitcard_http::{Handler, Request, Response, Result};

// Characters kept verbatim in the `next` parameter, as Django's `urlquote`
// with `safe="/"` would
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'/')
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// Redirect to `login_url` carrying the current path as `next`
///
/// # Examples
///
/// ```
/// use visitcard_auth::guard::redirect_to_login;
///
/// let response = redirect_to_login("/edit/1/", "/login/");
/// assert_eq!(response.status.as_u16(), 302);
/// assert_eq!(response.location(), Some("/login/?next=/edit/1/"));
/// ```
pub fn redirect_to_login(path: &str, login_url: &str) -> Response {
	let next = utf8_percent_encode(path, NEXT_ENCODE_SET);
	Response::temporary_redirect(format!("{login_url}?next={next}"))
}

/// Wraps a handler so that only authenticated (optionally staff) users
/// reach it.
///
/// Anonymous requests are redirected to the login page; authenticated
/// users lacking staff status get 403 when `staff_only` is set.
pub struct LoginRequired {
	inner: Arc<dyn Handler>,
	login_url: String,
	staff_only: bool,
}

impl LoginRequired {
	pub fn new(inner: Arc<dyn Handler>) -> Self {
		Self {
			inner,
			login_url: "/login/".to_string(),
			staff_only: false,
		}
	}

	pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
		self.login_url = login_url.into();
		self
	}

	pub fn staff_only(mut self) -> Self {
		self.staff_only = true;
		self
	}

	/// `Err` carries the response to send instead of running the handler
	pub fn check(&self, request: &Request) -> std::result::Result<(), Response> {
		let state = auth_state(request);
		if state.is_anonymous() {
			return Err(redirect_to_login(&request.full_path(), &self.login_url));
		}
		if self.staff_only && !state.is_staff {
			tracing::warn!(username = %state.username, path = %request.path(), "non-staff access denied");
			return Err(Response::forbidden().with_body("403 Forbidden"));
		}
		Ok(())
	}
}

#[async_trait]
impl Handler for LoginRequired {
	async fn handle(&self, request: Request) -> Result<Response> {
		if let Err(response) = self.check(&request) {
			return Ok(response);
		}
		self.inner.handle(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use visitcard_http::AuthState;

	struct Secret;

	#[async_trait]
	impl Handler for Secret {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("secret"))
		}
	}

	fn request_as(state: Option<AuthState>) -> Request {
		let request = Request::builder().uri("/edit/1/?tab=a").build().unwrap();
		if let Some(state) = state {
			request.extensions.insert(state);
		}
		request
	}

	#[rstest]
	#[tokio::test]
	async fn test_anonymous_is_redirected_with_next() {
		// Arrange
		let guard = LoginRequired::new(Arc::new(Secret));

		// Act
		let response = guard.handle(request_as(None)).await.unwrap();

		// Assert
		assert_eq!(response.status.as_u16(), 302);
		assert_eq!(response.location(), Some("/login/?next=/edit/1/%3Ftab%3Da"));
	}

	#[rstest]
	#[case(AuthState::authenticated(1, "ann", false), false, 200)]
	#[case(AuthState::authenticated(1, "ann", false), true, 403)]
	#[case(AuthState::authenticated(1, "root", true), true, 200)]
	#[tokio::test]
	async fn test_authenticated_access(
		#[case] state: AuthState,
		#[case] staff_only: bool,
		#[case] expected: u16,
	) {
		// Arrange
		let mut guard = LoginRequired::new(Arc::new(Secret));
		if staff_only {
			guard = guard.staff_only();
		}

		// Act
		let response = guard.handle(request_as(Some(state))).await.unwrap();

		// Assert
		assert_eq!(response.status.as_u16(), expected);
	}
}
