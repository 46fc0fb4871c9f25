//! Form body decoding for urlencoded and multipart requests.

use super::Request;
use crate::UploadedFile;
use futures_util::future::ready;
use futures_util::stream::once;
use std::collections::HashMap;
use visitcard_core::exception::{Error, Result};

/// Decoded form submission: text fields plus uploaded files
///
/// A repeated text field keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
	pub fields: HashMap<String, String>,
	pub files: HashMap<String, UploadedFile>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	pub fn with_file(mut self, file: UploadedFile) -> Self {
		self.files.insert(file.field_name.clone(), file);
		self
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str)
	}

	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.files.get(name)
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.files.is_empty()
	}
}

impl Request {
	/// Decode the body as a form.
	///
	/// `multipart/form-data` bodies are parsed with multer; anything else is
	/// treated as `application/x-www-form-urlencoded`. A file input left
	/// empty by the browser (no file name, no content) is dropped.
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_http::Request;
	/// use hyper::Method;
	///
	/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/login/")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("username=admin&password=a+b%21")
	///     .build()
	///     .unwrap();
	///
	/// let form = request.form_data().await.unwrap();
	/// assert_eq!(form.get("username"), Some("admin"));
	/// assert_eq!(form.get("password"), Some("a b!"));
	/// # });
	/// ```
	///
	/// # Errors
	///
	/// Returns [`Error::Http`] when the body cannot be decoded.
	pub async fn form_data(&self) -> Result<FormData> {
		let content_type = self.content_type().unwrap_or_default();
		if content_type
			.to_ascii_lowercase()
			.starts_with("multipart/form-data")
		{
			return self.multipart_form_data(content_type).await;
		}

		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(self.body())
			.map_err(|e| Error::Http(format!("Invalid form body: {}", e)))?;
		Ok(FormData {
			fields: pairs.into_iter().collect(),
			files: HashMap::new(),
		})
	}

	async fn multipart_form_data(&self, content_type: &str) -> Result<FormData> {
		let boundary = multer::parse_boundary(content_type)
			.map_err(|e| Error::Http(format!("Failed to parse boundary: {}", e)))?;

		// multer expects a stream; the body is already buffered
		let body = self.body().clone();
		let stream = once(ready(Ok::<_, std::io::Error>(body)));
		let mut multipart = multer::Multipart::new(stream, boundary);

		let mut form = FormData::new();
		while let Some(field) = multipart
			.next_field()
			.await
			.map_err(|e| Error::Http(format!("Invalid multipart body: {}", e)))?
		{
			let Some(name) = field.name().map(str::to_string) else {
				continue;
			};
			let filename = field.file_name().map(str::to_string);
			let content_type = field.content_type().map(|mime| mime.to_string());
			let data = field
				.bytes()
				.await
				.map_err(|e| Error::Http(format!("Invalid multipart field {}: {}", name, e)))?;

			match filename {
				Some(filename) => {
					if filename.is_empty() && data.is_empty() {
						continue;
					}
					let mut file = UploadedFile::new(name.clone(), filename, data);
					file.content_type = content_type;
					form.files.insert(name, file);
				}
				None => {
					form.fields
						.insert(name, String::from_utf8_lossy(&data).into_owned());
				}
			}
		}

		Ok(form)
	}
}

#[cfg(test)]
mod tests {
	use crate::Request;
	use hyper::Method;
	use rstest::rstest;

	fn multipart_request(body: &str) -> Request {
		Request::builder()
			.method(Method::POST)
			.uri("/edit/")
			.header("content-type", "multipart/form-data; boundary=XBOUND")
			.body(body.replace('\n', "\r\n"))
			.build()
			.unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_multipart_fields_and_file() {
		// Arrange
		let request = multipart_request(
			"--XBOUND
Content-Disposition: form-data; name=\"name\"

Ivan
--XBOUND
Content-Disposition: form-data; name=\"image\"; filename=\"me.gif\"
Content-Type: image/gif

GIF89a
--XBOUND--
",
		);

		// Act
		let form = request.form_data().await.unwrap();

		// Assert
		assert_eq!(form.get("name"), Some("Ivan"));
		let file = form.file("image").unwrap();
		assert_eq!(file.filename, "me.gif");
		assert_eq!(file.content_type.as_deref(), Some("image/gif"));
		assert_eq!(file.content.as_ref(), b"GIF89a");
	}

	#[rstest]
	#[tokio::test]
	async fn test_multipart_empty_file_input_is_dropped() {
		// Arrange
		let request = multipart_request(
			"--XBOUND
Content-Disposition: form-data; name=\"image\"; filename=\"\"
Content-Type: application/octet-stream


--XBOUND--
",
		);

		// Act
		let form = request.form_data().await.unwrap();

		// Assert
		assert!(form.file("image").is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_multipart_without_boundary_is_rejected() {
		// Arrange
		let request = Request::builder()
			.method(Method::POST)
			.header("content-type", "multipart/form-data")
			.body("x")
			.build()
			.unwrap();

		// Act
		let result = request.form_data().await;

		// Assert
		assert!(result.is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_urlencoded_body() {
		let request = Request::builder().method(Method::POST).build().unwrap();

		let form = request.form_data().await.unwrap();

		assert!(form.is_empty());
	}
}
