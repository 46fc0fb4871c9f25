//! Integer field with optional bounds

use crate::field::{FieldError, FieldResult, FormField, Widget, non_empty_str};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct IntegerField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<Value>,
	pub min_value: Option<i64>,
	pub max_value: Option<i64>,
}

impl IntegerField {
	/// Create an optional integer field
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_forms::FormField;
	/// use visitcard_forms::fields::IntegerField;
	/// use serde_json::json;
	///
	/// let field = IntegerField::new("priority").with_min_value(0).with_max_value(9);
	/// assert_eq!(field.clean(Some(&json!("3"))).unwrap(), json!(3));
	/// assert_eq!(
	///     field.clean(Some(&json!("111"))).unwrap_err().to_string(),
	///     "Ensure this value is less than or equal to 9."
	/// );
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::NumberInput,
			initial: None,
			min_value: None,
			max_value: None,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_min_value(mut self, min_value: i64) -> Self {
		self.min_value = Some(min_value);
		self
	}

	pub fn with_max_value(mut self, max_value: i64) -> Self {
		self.max_value = Some(max_value);
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
}

impl FormField for IntegerField {
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
			return Ok(Value::Null);
		};

		let number: i64 = text
			.parse()
			.map_err(|_| FieldError::Invalid("Enter a whole number.".to_string()))?;

		if let Some(max) = self.max_value
			&& number > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is less than or equal to {max}."
			)));
		}
		if let Some(min) = self.min_value
			&& number < min
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value is greater than or equal to {min}."
			)));
		}

		Ok(Value::from(number))
	}
}
