//! Image upload field

use crate::field::{FieldError, FieldResult, FormField, Widget};
use serde_json::Value;
use visitcard_http::UploadedFile;
use visitcard_http::upload::detect_mime_type;

const INVALID_IMAGE: &str =
	"Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

// SVG is excluded: it can carry script when served back
const IMAGE_MIME_TYPES: &[&str] = &[
	"image/jpeg",
	"image/png",
	"image/gif",
	"image/bmp",
	"image/webp",
	"image/tiff",
];

/// Image upload field, validated by file signature rather than by name or
/// client-supplied content type
#[derive(Debug, Clone)]
pub struct ImageField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub max_size: Option<usize>,
}

impl ImageField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::FileInput,
			max_size: None,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	/// Reject uploads larger than `bytes`
	pub fn with_max_size(mut self, bytes: usize) -> Self {
		self.max_size = Some(bytes);
		self
	}
}

impl FormField for ImageField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	// Text submissions never satisfy a file field
	fn clean(&self, _value: Option<&Value>) -> FieldResult<Value> {
		if self.required {
			return Err(FieldError::Required);
		}
		Ok(Value::Null)
	}

	fn is_file(&self) -> bool {
		true
	}

	fn clean_file(&self, file: Option<&UploadedFile>) -> FieldResult<Option<UploadedFile>> {
		let Some(file) = file else {
			if self.required {
				return Err(FieldError::Required);
			}
			return Ok(None);
		};

		if file.is_empty() {
			return Err(FieldError::Validation(
				"The submitted file is empty.".to_string(),
			));
		}
		if let Some(max) = self.max_size
			&& file.size() > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this file is at most {max} bytes (it is {}).",
				file.size()
			)));
		}
		match detect_mime_type(&file.content) {
			Some(mime) if IMAGE_MIME_TYPES.contains(&mime) => Ok(Some(file.clone())),
			_ => Err(FieldError::Invalid(INVALID_IMAGE.to_string())),
		}
	}
}
