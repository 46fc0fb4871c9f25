//! Profile image processing: resize-to-fill and JPEG encoding.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Edge length of the square profile image
pub const PROFILE_IMAGE_SIZE: u32 = 200;
pub const JPEG_QUALITY: u8 = 90;
/// Directory under the media root holding profile images
pub const UPLOAD_TO: &str = "imag";

#[derive(Debug, thiserror::Error)]
pub enum ImageProcessingError {
	#[error("Invalid image: {0}")]
	InvalidImage(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("image processing task failed: {0}")]
	Task(String),
}

impl From<ImageProcessingError> for visitcard_core::Error {
	fn from(error: ImageProcessingError) -> Self {
		match error {
			ImageProcessingError::Io(e) => Self::Io(e),
			other => Self::Internal(other.to_string()),
		}
	}
}

/// Scale `content` to cover a 200x200 square, crop the overflow and encode
/// the result as a quality-90 JPEG
pub fn resize_to_fill(content: &[u8]) -> Result<Vec<u8>, ImageProcessingError> {
	let img = image::load_from_memory(content).map_err(|e| {
		ImageProcessingError::InvalidImage(format!("Failed to load image: {e}"))
	})?;

	let filled = img
		.resize_to_fill(PROFILE_IMAGE_SIZE, PROFILE_IMAGE_SIZE, FilterType::Lanczos3)
		.to_rgb8();

	let mut buffer = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
		.encode_image(&filled)
		.map_err(|e| ImageProcessingError::InvalidImage(format!("Failed to encode image: {e}")))?;
	Ok(buffer)
}

/// Name for a stored upload: the original stem made path-safe, plus a
/// short random suffix
fn stored_file_name(original: &str) -> String {
	let stem = Path::new(original)
		.file_stem()
		.and_then(|stem| stem.to_str())
		.unwrap_or_default();
	let safe: String = stem
		.chars()
		.filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
		.take(40)
		.collect();
	let suffix = uuid::Uuid::new_v4().simple().to_string();
	if safe.is_empty() {
		format!("{}.jpg", &suffix[..12])
	} else {
		format!("{safe}_{}.jpg", &suffix[..8])
	}
}

/// Process an uploaded profile image and write it under
/// `{media_root}/imag/`.
///
/// Returns the stored path relative to `media_root`.
pub async fn save_profile_image(
	media_root: &Path,
	original_name: &str,
	content: bytes::Bytes,
) -> Result<String, ImageProcessingError> {
	let processed = tokio::task::spawn_blocking(move || resize_to_fill(&content))
		.await
		.map_err(|e| ImageProcessingError::Task(e.to_string()))??;

	let dir: PathBuf = media_root.join(UPLOAD_TO);
	tokio::fs::create_dir_all(&dir).await?;
	let file_name = stored_file_name(original_name);
	tokio::fs::write(dir.join(&file_name), &processed).await?;

	let relative = format!("{UPLOAD_TO}/{file_name}");
	tracing::info!(path = %relative, bytes = processed.len(), "stored profile image");
	Ok(relative)
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use image::{ImageBuffer, ImageFormat, Rgb};
	use rstest::rstest;
	use std::io::Cursor;

	/// A `width` x `height` PNG, red on the left half and blue on the right
	pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
		let img = ImageBuffer::from_fn(width, height, |x, _| {
			if x < width / 2 {
				Rgb([255u8, 0, 0])
			} else {
				Rgb([0u8, 0, 255])
			}
		});
		let mut buffer = Vec::new();
		img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
			.unwrap();
		buffer
	}

	#[rstest]
	#[case(640, 480)]
	#[case(50, 300)]
	#[case(200, 200)]
	fn test_resize_to_fill_is_square_jpeg(#[case] width: u32, #[case] height: u32) {
		// Act
		let jpeg = resize_to_fill(&png(width, height)).unwrap();

		// Assert
		assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
		let decoded = image::load_from_memory(&jpeg).unwrap();
		assert_eq!((decoded.width(), decoded.height()), (200, 200));
	}

	#[rstest]
	fn test_rejects_undecodable_content() {
		let result = resize_to_fill(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0]);

		assert!(matches!(result, Err(ImageProcessingError::InvalidImage(_))));
	}

	#[rstest]
	#[case("me.png", "me_")]
	#[case("../../etc/passwd", "passwd_")]
	#[case("фото.png", "")]
	fn test_stored_file_name_is_safe(#[case] original: &str, #[case] prefix: &str) {
		let name = stored_file_name(original);

		assert!(name.starts_with(prefix));
		assert!(name.ends_with(".jpg"));
		assert!(!name.contains('/'));
	}

	#[rstest]
	#[tokio::test]
	async fn test_save_profile_image_writes_under_imag() {
		// Arrange
		let media = tempfile::tempdir().unwrap();

		// Act
		let relative = save_profile_image(media.path(), "me.png", png(300, 100).into())
			.await
			.unwrap();

		// Assert
		assert!(relative.starts_with("imag/me_"));
		let stored = image::open(media.path().join(&relative)).unwrap();
		assert_eq!((stored.width(), stored.height()), (200, 200));
	}
}
