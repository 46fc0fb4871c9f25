use bytes::Bytes;
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;
use visitcard_core::exception::{Error, Result};

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Create a Response with HTTP 302 Found (temporary redirect)
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::temporary_redirect("/login/?next=/edit/");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(response.location(), Some("/login/?next=/edit/"));
	/// ```
	pub fn temporary_redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header, replacing any earlier value; invalid names or values are ignored
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Response;
	///
	/// let response = Response::ok().with_header("X-Frame-Options", "DENY");
	/// assert_eq!(response.header("x-frame-options"), Some("DENY"));
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Append a header without replacing earlier values of the same name
	pub fn append_header(&mut self, name: HeaderName, value: &str) {
		if let Ok(header_value) = HeaderValue::from_str(value) {
			self.headers.append(name, header_value);
		}
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(header::LOCATION, value);
		}
		self
	}

	/// Set the Content-Type header
	pub fn with_content_type(mut self, content_type: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(content_type) {
			self.headers.insert(header::CONTENT_TYPE, value);
		}
		self
	}

	/// An HTML page
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Response;
	///
	/// let response = Response::html("<h1>Hi</h1>");
	/// assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
	/// ```
	pub fn html(body: impl Into<Bytes>) -> Self {
		Self::ok()
			.with_content_type("text/html; charset=utf-8")
			.with_body(body)
	}

	/// Set the response body to JSON and add the Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!([{"req_id": 1}])).unwrap();
	/// assert_eq!(response.header("content-type"), Some("application/json"));
	/// assert_eq!(response.body, r#"[{"req_id":1}]"#);
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let json = serde_json::to_vec(data).map_err(|e| Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers.insert(
			header::CONTENT_TYPE,
			HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Header value as text, if present and valid UTF-8
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn location(&self) -> Option<&str> {
		self.header(header::LOCATION.as_str())
	}

	/// Body decoded as UTF-8, lossily
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		if status.is_server_error() {
			tracing::error!(error = %error, "request failed");
		}
		let body = serde_json::json!({
			"error": error.to_string(),
		});

		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::NotFound("About".into()), StatusCode::NOT_FOUND)]
	#[case(Error::PermissionDenied("staff only".into()), StatusCode::FORBIDDEN)]
	#[case(Error::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_from_error(#[case] error: Error, #[case] expected: StatusCode) {
		// Act
		let response = Response::from(error);

		// Assert
		assert_eq!(response.status, expected);
		assert_eq!(response.header("content-type"), Some("application/json"));
		assert!(response.text().contains("\"error\""));
	}

	#[rstest]
	fn test_append_header_keeps_previous() {
		// Arrange
		let mut response = Response::ok();

		// Act
		response.append_header(header::SET_COOKIE, "a=1");
		response.append_header(header::SET_COOKIE, "b=2");

		// Assert
		assert_eq!(response.headers.get_all(header::SET_COOKIE).iter().count(), 2);
	}

	#[rstest]
	fn test_invalid_header_is_ignored() {
		let response = Response::ok().with_header("bad header", "x");

		assert!(response.headers.is_empty());
	}
}
