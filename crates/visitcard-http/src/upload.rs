//! Uploaded files decoded from multipart bodies.

use bytes::Bytes;
use percent_encoding::percent_decode_str;

/// A file part of a `multipart/form-data` body, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
	pub field_name: String,
	/// Client-supplied file name, not trusted for paths
	pub filename: String,
	pub content_type: Option<String>,
	pub content: Bytes,
}

impl UploadedFile {
	pub fn new(
		field_name: impl Into<String>,
		filename: impl Into<String>,
		content: impl Into<Bytes>,
	) -> Self {
		Self {
			field_name: field_name.into(),
			filename: filename.into(),
			content_type: None,
			content: content.into(),
		}
	}

	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	pub fn size(&self) -> usize {
		self.content.len()
	}

	pub fn is_empty(&self) -> bool {
		self.content.is_empty()
	}

	/// MIME type sniffed from the leading bytes
	pub fn detected_mime_type(&self) -> Option<&'static str> {
		detect_mime_type(&self.content)
	}
}

/// Sniff a MIME type from file signatures
///
/// # Examples
///
/// ```
/// use visitcard_http::upload::detect_mime_type;
///
/// let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert_eq!(detect_mime_type(&png), Some("image/png"));
/// assert_eq!(detect_mime_type(&[0xFF, 0xD8, 0xFF]), Some("image/jpeg"));
/// assert_eq!(detect_mime_type(b"plain text"), None);
/// ```
pub fn detect_mime_type(content: &[u8]) -> Option<&'static str> {
	const SIGNATURES: &[(&[u8], &str)] = &[
		(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
		(&[0xFF, 0xD8, 0xFF], "image/jpeg"),
		(b"GIF87a", "image/gif"),
		(b"GIF89a", "image/gif"),
		(b"BM", "image/bmp"),
		(&[0x49, 0x49, 0x2A, 0x00], "image/tiff"),
		(&[0x4D, 0x4D, 0x00, 0x2A], "image/tiff"),
		(b"%PDF", "application/pdf"),
	];

	if content.len() >= 12 && &content[0..4] == b"RIFF" && &content[8..12] == b"WEBP" {
		return Some("image/webp");
	}

	SIGNATURES
		.iter()
		.find(|(magic, _)| content.starts_with(magic))
		.map(|(_, mime)| *mime)
}

/// Whether a single path segment is safe to join onto a storage root.
///
/// Checks both the raw and the percent-decoded form so `%2e%2e` cannot
/// sneak a parent reference through.
///
/// # Examples
///
/// ```
/// use visitcard_http::upload::is_safe_path_segment;
///
/// assert!(is_safe_path_segment("photo.jpg"));
/// assert!(!is_safe_path_segment(".."));
/// assert!(!is_safe_path_segment("%2e%2e"));
/// assert!(!is_safe_path_segment("a\\b"));
/// assert!(!is_safe_path_segment(""));
/// ```
pub fn is_safe_path_segment(segment: &str) -> bool {
	if segment.is_empty() {
		return false;
	}
	let decoded = percent_decode_str(segment).decode_utf8_lossy();
	[segment, decoded.as_ref()].iter().all(|candidate| {
		!candidate.contains('\0')
			&& !candidate.contains("..")
			&& !candidate.contains('/')
			&& !candidate.contains('\\')
			&& !(candidate.len() >= 2
				&& candidate.as_bytes()[0].is_ascii_alphabetic()
				&& candidate.as_bytes()[1] == b':')
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(b"GIF89a....".as_slice(), Some("image/gif"))]
	#[case(b"RIFF\x00\x00\x00\x00WEBPVP8 ".as_slice(), Some("image/webp"))]
	#[case(b"BM\x00\x00".as_slice(), Some("image/bmp"))]
	#[case(b"".as_slice(), None)]
	fn test_detect_mime_type(#[case] content: &[u8], #[case] expected: Option<&str>) {
		assert_eq!(detect_mime_type(content), expected);
	}

	#[rstest]
	fn test_uploaded_file() {
		// Arrange
		let file = UploadedFile::new("image", "me.png", vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
			.with_content_type("image/png");

		// Assert
		assert_eq!(file.size(), 8);
		assert!(!file.is_empty());
		assert_eq!(file.detected_mime_type(), Some("image/png"));
		assert_eq!(file.content_type.as_deref(), Some("image/png"));
	}

	#[rstest]
	#[case("C:evil")]
	#[case("..%2f")]
	#[case("a\0b")]
	fn test_unsafe_segments(#[case] segment: &str) {
		assert!(!is_safe_path_segment(segment));
	}
}
