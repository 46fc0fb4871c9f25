//! Field trait, widgets and field-level errors.

use serde_json::Value;
use visitcard_http::UploadedFile;

/// A field-level validation failure; `Display` is the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required.")]
	Required,
	#[error("{0}")]
	Invalid(String),
	#[error("{0}")]
	Validation(String),
}

pub type FieldResult<T> = Result<T, FieldError>;

/// HTML input rendering for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
	TextInput,
	EmailInput,
	NumberInput,
	PasswordInput,
	DateInput,
	DateTimeInput,
	Textarea { rows: u32, cols: u32 },
	FileInput,
}

impl Widget {
	/// Render the widget for `name` with the current `value`
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_forms::Widget;
	///
	/// assert_eq!(
	///     Widget::TextInput.render("name", Some("<b>"), true),
	///     r#"<input type="text" name="name" id="id_name" value="&lt;b&gt;" required>"#
	/// );
	/// assert_eq!(
	///     Widget::Textarea { rows: 3, cols: 40 }.render("bio", None, false),
	///     r#"<textarea name="bio" id="id_bio" rows="3" cols="40"></textarea>"#
	/// );
	/// ```
	pub fn render(&self, name: &str, value: Option<&str>, required: bool) -> String {
		let required_attr = if required { " required" } else { "" };
		let name = escape_html(name);
		match self {
			Widget::Textarea { rows, cols } => format!(
				r#"<textarea name="{name}" id="id_{name}" rows="{rows}" cols="{cols}"{required_attr}>{}</textarea>"#,
				escape_html(value.unwrap_or_default())
			),
			// Browsers never prefill file or password inputs
			Widget::FileInput | Widget::PasswordInput => format!(
				r#"<input type="{}" name="{name}" id="id_{name}"{required_attr}>"#,
				self.input_type()
			),
			_ => {
				let value_attr = value
					.map(|v| format!(r#" value="{}""#, escape_html(v)))
					.unwrap_or_default();
				format!(
					r#"<input type="{}" name="{name}" id="id_{name}"{value_attr}{required_attr}>"#,
					self.input_type()
				)
			}
		}
	}

	pub fn input_type(&self) -> &'static str {
		match self {
			Widget::TextInput => "text",
			Widget::EmailInput => "email",
			Widget::NumberInput => "number",
			Widget::PasswordInput => "password",
			Widget::DateInput => "date",
			Widget::DateTimeInput => "datetime-local",
			Widget::Textarea { .. } => "textarea",
			Widget::FileInput => "file",
		}
	}

	pub fn needs_multipart(&self) -> bool {
		matches!(self, Widget::FileInput)
	}
}

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// A single form field.
///
/// Text fields implement [`clean`](Self::clean), which receives the raw
/// submitted value (a JSON string, or `None` when absent) and returns the
/// normalised value. File fields override [`is_file`](Self::is_file) and
/// [`clean_file`](Self::clean_file) instead.
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;
	fn label(&self) -> Option<&str>;
	fn required(&self) -> bool;
	fn help_text(&self) -> Option<&str> {
		None
	}
	fn widget(&self) -> &Widget;
	fn initial(&self) -> Option<&Value> {
		None
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value>;

	fn is_file(&self) -> bool {
		false
	}

	fn clean_file(&self, file: Option<&UploadedFile>) -> FieldResult<Option<UploadedFile>> {
		match file {
			None if self.required() => Err(FieldError::Required),
			other => Ok(other.cloned()),
		}
	}
}

/// Raw value as a trimmed string, `None` when absent, null or blank
pub(crate) fn non_empty_str(value: Option<&Value>) -> FieldResult<Option<String>> {
	match value {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => {
			let trimmed = s.trim();
			Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
		}
		Some(Value::Number(n)) => Ok(Some(n.to_string())),
		Some(_) => Err(FieldError::Invalid("Enter a valid value.".to_string())),
	}
}
