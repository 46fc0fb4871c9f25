//! Date and time field

use crate::field::{FieldError, FieldResult, FormField, Widget, non_empty_str};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

pub const DATETIME_INPUT_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%d %H:%M",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%dT%H:%M",
];

/// Date-time field. Naive inputs are taken as UTC; the cleaned value is an
/// RFC 3339 string.
#[derive(Debug, Clone)]
pub struct DateTimeField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub widget: Widget,
	pub initial: Option<Value>,
}

impl DateTimeField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			widget: Widget::DateTimeInput,
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

	pub fn parse(text: &str) -> Option<DateTime<Utc>> {
		if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
			return Some(parsed.with_timezone(&Utc));
		}
		DATETIME_INPUT_FORMATS
			.iter()
			.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
			.or_else(|| {
				NaiveDate::parse_from_str(text, "%Y-%m-%d")
					.ok()
					.and_then(|date| date.and_hms_opt(0, 0, 0))
			})
			.map(|naive| naive.and_utc())
	}
}

impl FormField for DateTimeField {
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

		let datetime = Self::parse(&text)
			.ok_or_else(|| FieldError::Invalid("Enter a valid date/time.".to_string()))?;
		Ok(Value::String(
			datetime.to_rfc3339_opts(SecondsFormat::Micros, true),
		))
	}
}
