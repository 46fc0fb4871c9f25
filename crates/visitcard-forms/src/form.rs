use crate::field::{FieldError, FormField};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Value, json};
use std::collections::HashMap;
use visitcard_http::{FormData, UploadedFile};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Validation error: {0}")]
	Validation(String),
}

pub type FormResult<T> = Result<T, FormError>;

type CleanFunction = Box<dyn Fn(&HashMap<String, Value>) -> FormResult<()> + Send + Sync>;

/// Key under which form-level (non-field) errors are stored
pub const ALL_FIELDS_KEY: &str = "_all";

/// A set of fields bound to submitted data.
///
/// An unbound form only renders its initial values. After [`bind`](Self::bind),
/// [`is_valid`](Self::is_valid) cleans every field and collects error
/// messages per field name; cleaned values are then read through the typed
/// getters.
#[derive(Default)]
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, Value>,
	files: HashMap<String, UploadedFile>,
	initial: HashMap<String, Value>,
	cleaned: HashMap<String, Value>,
	cleaned_files: HashMap<String, UploadedFile>,
	errors: HashMap<String, Vec<String>>,
	is_bound: bool,
	clean_functions: Vec<CleanFunction>,
}

impl Form {
	/// Create an empty, unbound form
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_forms::Form;
	/// use visitcard_forms::fields::IntegerField;
	/// use visitcard_http::FormData;
	///
	/// let mut form = Form::new().with_field(IntegerField::new("priority").required());
	/// assert!(!form.is_valid());
	///
	/// form.bind(&FormData::new().with_field("priority", "1"));
	/// assert!(form.is_valid());
	/// assert_eq!(form.get_i64("priority"), Some(1));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.push(field);
	}

	pub fn with_field(mut self, field: impl FormField + 'static) -> Self {
		self.add_field(Box::new(field));
		self
	}

	/// Register a form-level check that runs after every field cleaned
	/// successfully
	pub fn add_clean_function<F>(&mut self, f: F)
	where
		F: Fn(&HashMap<String, Value>) -> FormResult<()> + Send + Sync + 'static,
	{
		self.clean_functions.push(Box::new(f));
	}

	/// Bind submitted fields and files
	pub fn bind(&mut self, form_data: &FormData) {
		self.data = form_data
			.fields
			.iter()
			.map(|(name, value)| (name.clone(), Value::String(value.clone())))
			.collect();
		self.files = form_data.files.clone();
		self.is_bound = true;
	}

	pub fn set_initial(&mut self, initial: HashMap<String, Value>) {
		self.initial = initial;
	}

	pub fn set_initial_value(&mut self, name: &str, value: impl Into<Value>) {
		self.initial.insert(name.to_string(), value.into());
	}

	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	/// Clean every field and run the form-level checks.
	///
	/// Always `false` for an unbound form.
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.errors.clear();
		self.cleaned.clear();
		self.cleaned_files.clear();

		for field in &self.fields {
			let name = field.name().to_string();
			if field.is_file() {
				match field.clean_file(self.files.get(&name)) {
					Ok(Some(file)) => {
						self.cleaned_files.insert(name, file);
					}
					Ok(None) => {}
					Err(e) => self.errors.entry(name).or_default().push(e.to_string()),
				}
				continue;
			}

			match field.clean(self.data.get(&name)) {
				Ok(cleaned) => {
					self.cleaned.insert(name, cleaned);
				}
				Err(e) => self.errors.entry(name).or_default().push(e.to_string()),
			}
		}

		if self.errors.is_empty() {
			for clean_fn in &self.clean_functions {
				match clean_fn(&self.cleaned) {
					Ok(()) => {}
					Err(FormError::Field { field, error }) => {
						self.errors.entry(field).or_default().push(error.to_string());
					}
					Err(FormError::Validation(msg)) => {
						self.errors
							.entry(ALL_FIELDS_KEY.to_string())
							.or_default()
							.push(msg);
					}
				}
			}
		}

		self.errors.is_empty()
	}

	/// Attach an error after validation, e.g. a failed authentication.
	///
	/// `None` adds a form-level error.
	pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
		self.errors
			.entry(field.unwrap_or(ALL_FIELDS_KEY).to_string())
			.or_default()
			.push(message.into());
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	pub fn field_errors(&self, name: &str) -> &[String] {
		self.errors.get(name).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn non_field_errors(&self) -> &[String] {
		self.field_errors(ALL_FIELDS_KEY)
	}

	pub fn cleaned_data(&self) -> &HashMap<String, Value> {
		&self.cleaned
	}

	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}

	/// Cleaned text; blank optional fields yield `Some("")`
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.cleaned.get(name).and_then(Value::as_str)
	}

	/// Cleaned text, `None` when blank
	pub fn get_opt_string(&self, name: &str) -> Option<String> {
		self.get_str(name)
			.filter(|value| !value.is_empty())
			.map(str::to_string)
	}

	pub fn get_i64(&self, name: &str) -> Option<i64> {
		self.cleaned.get(name).and_then(Value::as_i64)
	}

	pub fn get_date(&self, name: &str) -> Option<NaiveDate> {
		self.get_str(name)
			.and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
	}

	pub fn get_datetime(&self, name: &str) -> Option<DateTime<Utc>> {
		self.get_str(name)
			.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
			.map(|value| value.with_timezone(&Utc))
	}

	/// Validated upload for a file field
	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.cleaned_files.get(name)
	}

	/// Whether the form must be submitted as `multipart/form-data`
	pub fn is_multipart(&self) -> bool {
		self.fields.iter().any(|field| field.widget().needs_multipart())
	}

	/// Value shown in the widget: submitted data when bound, else initial
	fn display_value(&self, name: &str) -> Option<String> {
		let value = if self.is_bound {
			self.data.get(name)
		} else {
			self.initial.get(name)
		};
		match value? {
			Value::Null => None,
			Value::String(s) => Some(s.clone()),
			other => Some(other.to_string()),
		}
	}

	/// Template context describing every field, its rendered widget and its
	/// errors
	pub fn context(&self) -> Value {
		let fields: Vec<Value> = self
			.fields
			.iter()
			.map(|field| {
				let name = field.name();
				let value = self.display_value(name);
				json!({
					"name": name,
					"label": field.label().map(str::to_string).unwrap_or_else(|| pretty_name(name)),
					"help_text": field.help_text(),
					"required": field.required(),
					"value": value,
					"html": field.widget().render(name, value.as_deref(), field.required()),
					"errors": self.field_errors(name),
				})
			})
			.collect();

		json!({
			"fields": fields,
			"non_field_errors": self.non_field_errors(),
			"is_bound": self.is_bound,
			"multipart": self.is_multipart(),
		})
	}
}

/// `date_of_birth` becomes `Date of birth`
pub fn pretty_name(name: &str) -> String {
	let spaced = name.replace('_', " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fields::{CharField, DateField, ImageField, IntegerField};
	use rstest::rstest;

	fn profile_form() -> Form {
		Form::new()
			.with_field(CharField::new("name").required().with_max_length(200))
			.with_field(DateField::new("date_of_birth"))
			.with_field(ImageField::new("image"))
	}

	#[rstest]
	fn test_unbound_form_is_invalid() {
		let mut form = profile_form();

		assert!(!form.is_valid());
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_errors_are_keyed_by_field() {
		// Arrange
		let mut form = profile_form();
		form.bind(&FormData::new().with_field("date_of_birth", "someday"));

		// Act
		let valid = form.is_valid();

		// Assert
		assert!(!valid);
		assert_eq!(form.field_errors("name"), ["This field is required."]);
		assert_eq!(form.field_errors("date_of_birth"), ["Enter a valid date."]);
		assert!(form.field_errors("image").is_empty());
	}

	#[rstest]
	fn test_typed_getters() {
		// Arrange
		let png = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
		let mut form = profile_form();
		form.bind(
			&FormData::new()
				.with_field("name", "Ann")
				.with_field("date_of_birth", "1990-05-17")
				.with_file(UploadedFile::new("image", "me.png", png)),
		);

		// Act
		assert!(form.is_valid());

		// Assert
		assert_eq!(form.get_str("name"), Some("Ann"));
		assert_eq!(
			form.get_date("date_of_birth"),
			NaiveDate::from_ymd_opt(1990, 5, 17)
		);
		assert_eq!(form.file("image").map(|f| f.filename.as_str()), Some("me.png"));
	}

	#[rstest]
	fn test_clean_function_adds_non_field_error() {
		// Arrange
		let mut form = Form::new().with_field(IntegerField::new("priority"));
		form.add_clean_function(|data| {
			if data.get("priority").and_then(Value::as_i64) == Some(7) {
				return Err(FormError::Validation("Seven is reserved.".to_string()));
			}
			Ok(())
		});
		form.bind(&FormData::new().with_field("priority", "7"));

		// Act
		let valid = form.is_valid();

		// Assert
		assert!(!valid);
		assert_eq!(form.non_field_errors(), ["Seven is reserved."]);
	}

	#[rstest]
	fn test_context_uses_initial_until_bound() {
		// Arrange
		let mut form = profile_form();
		form.set_initial_value("name", "Initial");

		// Act
		let unbound = form.context();
		form.bind(&FormData::new().with_field("name", "<Bound>"));
		let bound = form.context();

		// Assert
		assert_eq!(unbound["fields"][0]["value"], json!("Initial"));
		assert_eq!(unbound["fields"][1]["label"], json!("Date of birth"));
		assert_eq!(bound["fields"][0]["value"], json!("<Bound>"));
		assert!(
			bound["fields"][0]["html"]
				.as_str()
				.unwrap()
				.contains(r#"value="&lt;Bound&gt;""#)
		);
		assert_eq!(bound["multipart"], json!(true));
	}

	#[rstest]
	fn test_add_error_after_validation() {
		let mut form = Form::new().with_field(CharField::new("username"));
		form.bind(&FormData::new().with_field("username", "ann"));
		assert!(form.is_valid());

		form.add_error(None, "Please enter a correct username and password.");

		assert_eq!(
			form.non_field_errors(),
			["Please enter a correct username and password."]
		);
	}

	#[rstest]
	#[case("date_of_birth", "Date of birth")]
	#[case("name", "Name")]
	#[case("", "")]
	fn test_pretty_name(#[case] name: &str, #[case] expected: &str) {
		assert_eq!(pretty_name(name), expected);
	}
}
