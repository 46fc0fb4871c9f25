//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, Widget, non_empty_str};
use serde_json::Value;

/// Character field with length validation
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<Value>,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
}

impl CharField {
	/// Create an optional text field
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_forms::fields::CharField;
	///
	/// let field = CharField::new("name").required().with_max_length(200);
	/// assert!(field.required);
	/// assert_eq!(field.max_length, Some(200));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::TextInput,
			initial: None,
			max_length: None,
			min_length: None,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
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

	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = widget;
		self
	}

	/// Render as a `<textarea>`
	pub fn textarea(self) -> Self {
		self.with_widget(Widget::Textarea { rows: 10, cols: 40 })
	}

	pub fn password(self) -> Self {
		self.with_widget(Widget::PasswordInput)
	}
}

impl FormField for CharField {
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

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let Some(text) = non_empty_str(value)? else {
			if self.required {
				return Err(FieldError::Required);
			}
			return Ok(Value::String(String::new()));
		};

		let length = text.chars().count();
		if let Some(max) = self.max_length
			&& length > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {max} characters (it has {length})."
			)));
		}
		if let Some(min) = self.min_length
			&& length < min
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at least {min} characters (it has {length})."
			)));
		}

		Ok(Value::String(text))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_required_rejects_blank() {
		let field = CharField::new("name").required();

		assert_eq!(field.clean(Some(&json!("  "))), Err(FieldError::Required));
		assert_eq!(field.clean(None), Err(FieldError::Required));
	}

	#[rstest]
	fn test_optional_blank_is_empty_string() {
		let field = CharField::new("bio");

		assert_eq!(field.clean(None).unwrap(), json!(""));
	}

	#[rstest]
	#[case("abc", true)]
	#[case("abcd", false)]
	#[case("äöü", true)]
	fn test_max_length_counts_chars(#[case] input: &str, #[case] ok: bool) {
		let field = CharField::new("name").with_max_length(3);

		assert_eq!(field.clean(Some(&json!(input))).is_ok(), ok);
	}

	#[rstest]
	fn test_max_length_message() {
		// Arrange
		let field = CharField::new("name").with_max_length(2);

		// Act
		let err = field.clean(Some(&json!("abcd"))).unwrap_err();

		// Assert
		assert_eq!(
			err.to_string(),
			"Ensure this value has at most 2 characters (it has 4)."
		);
	}

	#[rstest]
	fn test_strips_whitespace() {
		let field = CharField::new("name");

		assert_eq!(field.clean(Some(&json!("  Ann \n"))).unwrap(), json!("Ann"));
	}
}
