//! Calendar date field

use crate::field::{FieldError, FieldResult, FormField, Widget, non_empty_str};
use chrono::NaiveDate;
use serde_json::Value;

/// Accepted input formats, tried in order
pub const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d.%m.%Y"];

/// Date field; cleans to an ISO `YYYY-MM-DD` string
#[derive(Debug, Clone)]
pub struct DateField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub widget: Widget,
	pub initial: Option<Value>,
}

impl DateField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			widget: Widget::DateInput,
			initial: None,
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

	pub fn parse(text: &str) -> Option<NaiveDate> {
		DATE_INPUT_FORMATS
			.iter()
			.find_map(|format| NaiveDate::parse_from_str(text, format).ok())
	}
}

impl FormField for DateField {
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

		let date = Self::parse(&text)
			.ok_or_else(|| FieldError::Invalid("Enter a valid date.".to_string()))?;
		Ok(Value::String(date.format("%Y-%m-%d").to_string()))
	}
}
