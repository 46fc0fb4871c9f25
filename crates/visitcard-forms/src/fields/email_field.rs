//! Email address field

use crate::field::{FieldError, FieldResult, FormField, Widget, non_empty_str};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

// local@domain.tld, no whitespace, at least one dot in the domain
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

#[derive(Debug, Clone)]
pub struct EmailField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub widget: Widget,
	pub max_length: Option<usize>,
}

impl EmailField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			widget: Widget::EmailInput,
			max_length: None,
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

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for EmailField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let Some(email) = non_empty_str(value)? else {
			if self.required {
				return Err(FieldError::Required);
			}
			return Ok(Value::String(String::new()));
		};

		let length = email.chars().count();
		if let Some(max) = self.max_length
			&& length > max
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {max} characters (it has {length})."
			)));
		}
		if !EMAIL_REGEX.is_match(&email) {
			return Err(FieldError::Invalid("Enter a valid email address.".to_string()));
		}

		Ok(Value::String(email))
	}
}
