use super::Request;
use hyper::Uri;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Decode one `application/x-www-form-urlencoded` component (`+` is a space)
fn decode_component(raw: &str) -> String {
	percent_decode_str(&raw.replace('+', " "))
		.decode_utf8_lossy()
		.into_owned()
}

impl Request {
	/// Parse query parameters from URI, keeping them encoded
	pub(super) fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Path plus query string, as sent by the client
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	///
	/// let request = Request::builder().uri("/request/?priority=high").build().unwrap();
	/// assert_eq!(request.full_path(), "/request/?priority=high");
	/// ```
	pub fn full_path(&self) -> &str {
		self.uri
			.path_and_query()
			.map(|pq| pq.as_str())
			.unwrap_or_else(|| self.uri.path())
	}

	/// Get URL-decoded query parameters
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| (decode_component(k), decode_component(v)))
			.collect()
	}

	/// A single decoded query parameter
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/login/?next=%2Fedit%2F&page=2")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.query_param("next").as_deref(), Some("/edit/"));
	/// assert_eq!(request.query_param("page").as_deref(), Some("2"));
	/// assert_eq!(request.query_param("missing"), None);
	/// ```
	pub fn query_param(&self, key: &str) -> Option<String> {
		self.query_params
			.iter()
			.find(|(k, _)| decode_component(k) == key)
			.map(|(_, v)| decode_component(v))
	}

	/// Set a path parameter from its raw URL form (used by the router for
	/// `{name}` segments); percent escapes are decoded, `+` is kept
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
		let value = percent_decode_str(value.as_ref()).decode_utf8_lossy().into_owned();
		self.path_params.insert(key.into(), value);
	}

	pub fn path_param(&self, key: &str) -> Option<&str> {
		self.path_params.get(key).map(String::as_str)
	}
}
