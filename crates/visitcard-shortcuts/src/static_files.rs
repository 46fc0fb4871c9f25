//! Serving files from the media and static roots.

use hyper::StatusCode;
use std::path::{Path, PathBuf};
use visitcard_core::exception::Error;
use visitcard_http::upload::is_safe_path_segment;
use visitcard_http::{Response, Result};

/// Content type for a file name, by extension
///
/// # Examples
///
/// ```
/// use visitcard_shortcuts::static_files::content_type_for;
///
/// assert_eq!(content_type_for("imag/me.JPG"), "image/jpeg");
/// assert_eq!(content_type_for("js/ajax-form.js"), "application/javascript; charset=utf-8");
/// assert_eq!(content_type_for("README"), "application/octet-stream");
/// ```
pub fn content_type_for(name: &str) -> &'static str {
	let extension = Path::new(name)
		.extension()
		.and_then(|ext| ext.to_str())
		.map(str::to_ascii_lowercase);
	match extension.as_deref() {
		Some("html" | "htm") => "text/html; charset=utf-8",
		Some("css") => "text/css; charset=utf-8",
		Some("js") => "application/javascript; charset=utf-8",
		Some("json") => "application/json",
		Some("txt") => "text/plain; charset=utf-8",
		Some("jpg" | "jpeg") => "image/jpeg",
		Some("png") => "image/png",
		Some("gif") => "image/gif",
		Some("webp") => "image/webp",
		Some("bmp") => "image/bmp",
		Some("ico") => "image/x-icon",
		Some("svg") => "image/svg+xml",
		Some("woff") => "font/woff",
		Some("woff2") => "font/woff2",
		_ => "application/octet-stream",
	}
}

/// Resolve `relative` under `root`, rejecting any unsafe segment
pub fn safe_join(root: &Path, relative: &str) -> Option<PathBuf> {
	let mut path = root.to_path_buf();
	for segment in relative.split('/') {
		if !is_safe_path_segment(segment) {
			return None;
		}
		path.push(segment);
	}
	Some(path)
}

/// Serve `relative` from `root`.
///
/// Traversal attempts, directories and missing files are all 404.
pub async fn serve_file(root: &Path, relative: &str) -> Result<Response> {
	let not_found = || Error::NotFound(format!("{relative} not found"));

	let Some(path) = safe_join(root, relative) else {
		tracing::warn!(path = relative, "rejected unsafe file path");
		return Err(not_found());
	};

	match tokio::fs::metadata(&path).await {
		Ok(metadata) if metadata.is_file() => {}
		_ => return Err(not_found()),
	}
	let content = tokio::fs::read(&path).await?;

	Ok(Response::new(StatusCode::OK)
		.with_content_type(content_type_for(relative))
		.with_body(content))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test]
	async fn test_serves_nested_file() {
		// Arrange
		let root = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(root.path().join("imag")).unwrap();
		std::fs::write(root.path().join("imag/me.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();

		// Act
		let response = serve_file(root.path(), "imag/me.jpg").await.unwrap();

		// Assert
		assert_eq!(response.header("content-type"), Some("image/jpeg"));
		assert_eq!(response.body.as_ref(), &[0xFF, 0xD8, 0xFF]);
	}

	#[rstest]
	#[case("../secret.txt")]
	#[case("imag/../../secret.txt")]
	#[case("%2e%2e/secret.txt")]
	#[case("imag")]
	#[case("missing.png")]
	#[case("")]
	#[tokio::test]
	async fn test_not_found(#[case] relative: &str) {
		// Arrange
		let parent = tempfile::tempdir().unwrap();
		std::fs::write(parent.path().join("secret.txt"), "s3cret").unwrap();
		let root = parent.path().join("media");
		std::fs::create_dir_all(root.join("imag")).unwrap();

		// Act
		let result = serve_file(&root, relative).await;

		// Assert
		assert!(matches!(result, Err(Error::NotFound(_))));
	}
}
