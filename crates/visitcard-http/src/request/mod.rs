//! Buffered HTTP request.

mod body;
mod params;

pub use body::FormData;

use crate::Extensions;
use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;
use std::net::SocketAddr;
use visitcard_core::exception::{Error, Result};

/// HTTP Request representation
///
/// The body is fully read before the request reaches any handler.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	body: Bytes,
	/// Path parameters captured by the router (e.g. `{id}`)
	pub path_params: HashMap<String, String>,
	/// Raw (still percent-encoded) query parameters
	pub query_params: HashMap<String, String>,
	/// Per-request data attached by middleware
	pub extensions: Extensions,
	pub remote_addr: Option<SocketAddr>,
}

impl Request {
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
			remote_addr: None,
		}
	}

	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/request/3/edit/?x=1")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("priority=4")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/request/3/edit/");
	/// assert_eq!(request.body().as_ref(), b"priority=4");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Header value as text, if present and valid UTF-8
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	pub fn content_type(&self) -> Option<&str> {
		self.header(hyper::header::CONTENT_TYPE.as_str())
	}

	/// Whether the request was sent by script (`X-Requested-With: XMLHttpRequest`)
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/edit/")
	///     .header("X-Requested-With", "XMLHttpRequest")
	///     .build()
	///     .unwrap();
	/// assert!(request.is_ajax());
	/// ```
	pub fn is_ajax(&self) -> bool {
		self.header("x-requested-with")
			.is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
	}

	/// Value of a cookie sent with the request
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("cookie", "theme=dark; sessionid=abc123")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.cookie("sessionid").as_deref(), Some("abc123"));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(hyper::header::COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.flat_map(|value| value.split(';'))
			.filter_map(|pair| pair.trim().split_once('='))
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value.trim_matches('"').to_string())
	}

	pub fn is_secure(&self) -> bool {
		self.uri.scheme_str() == Some("https")
			|| self
				.header("x-forwarded-proto")
				.is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
	invalid_header: Option<String>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Append a header; an invalid name or value fails [`build`](Self::build)
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.append(name, value);
			}
			_ => self.invalid_header = Some(name.to_string()),
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	/// # Errors
	///
	/// Returns [`Error::Http`] when the URI does not parse or a header was invalid.
	pub fn build(self) -> Result<Request> {
		if let Some(name) = self.invalid_header {
			return Err(Error::Http(format!("Invalid header: {}", name)));
		}
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| Error::Http(format!("Invalid URI: {}", e)))?;

		let mut request = Request::new(self.method, uri, self.version, self.headers, self.body);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
