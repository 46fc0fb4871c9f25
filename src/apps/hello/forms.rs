//! Forms for editing the profile and a request's priority.

use super::models::{About, AllRequest};
use serde_json::Value;
use std::collections::HashMap;
use visitcard_forms::{CharField, DateField, EmailField, Form, ImageField, IntegerField, Widget};

/// Largest accepted upload before resizing
pub const MAX_IMAGE_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Profile text fields, without the image; the birth date may be blank
pub fn about_details_form() -> Form {
	about_fields(DateField::new("date"))
}

fn about_fields(date: DateField) -> Form {
	Form::new()
		.with_field(CharField::new("name").required().with_max_length(200))
		.with_field(CharField::new("last_name").required().with_max_length(200))
		.with_field(date.with_label("Date of birth"))
		.with_field(
			CharField::new("bio")
				.with_widget(Widget::Textarea { rows: 5, cols: 40 })
				.with_label("Bio"),
		)
		.with_field(EmailField::new("email").required().with_max_length(100))
		.with_field(CharField::new("jabber").required().with_max_length(100))
		.with_field(CharField::new("skype").required().with_max_length(100))
		.with_field(CharField::new("other_contact").textarea())
}

/// The profile edit form for `person`.
///
/// The birth date is required. An image must be uploaded while `person` has
/// none stored; afterwards a submitted image replaces the current one.
pub fn about_form(person: &About) -> Form {
	let image = ImageField::new("image")
		.with_max_size(MAX_IMAGE_UPLOAD_SIZE)
		.with_help_text("Resized to 200x200");
	let image = if person.image.is_none() { image.required() } else { image };
	about_fields(DateField::new("date").required()).with_field(image)
}

/// Initial widget values for `person`
pub fn about_initial(person: &About) -> HashMap<String, Value> {
	let mut initial = HashMap::new();
	initial.insert("name".to_string(), Value::from(person.name.as_str()));
	initial.insert("last_name".to_string(), Value::from(person.last_name.as_str()));
	if let Some(date) = person.date {
		initial.insert("date".to_string(), Value::from(date.format("%Y-%m-%d").to_string()));
	}
	if let Some(bio) = &person.bio {
		initial.insert("bio".to_string(), Value::from(bio.as_str()));
	}
	initial.insert("email".to_string(), Value::from(person.email.as_str()));
	initial.insert("jabber".to_string(), Value::from(person.jabber.as_str()));
	initial.insert("skype".to_string(), Value::from(person.skype.as_str()));
	if let Some(other) = &person.other_contact {
		initial.insert("other_contact".to_string(), Value::from(other.as_str()));
	}
	initial
}

/// Copy the cleaned text fields of a valid [`about_form`] onto `person`.
///
/// The image is handled separately since it needs processing.
pub fn apply_about(form: &Form, person: &mut About) {
	person.name = form.get_str("name").unwrap_or_default().to_string();
	person.last_name = form.get_str("last_name").unwrap_or_default().to_string();
	person.date = form.get_date("date");
	person.bio = form.get_opt_string("bio");
	person.email = form.get_str("email").unwrap_or_default().to_string();
	person.jabber = form.get_str("jabber").unwrap_or_default().to_string();
	person.skype = form.get_str("skype").unwrap_or_default().to_string();
	person.other_contact = form.get_opt_string("other_contact");
}

/// Priority edit form: a single digit
pub fn request_form() -> Form {
	Form::new().with_field(
		IntegerField::new("priority")
			.required()
			.with_min_value(0)
			.with_max_value(9)
			.with_help_text("0 is low, 1 is high"),
	)
}

pub fn request_initial(request: &AllRequest) -> HashMap<String, Value> {
	HashMap::from([("priority".to_string(), Value::from(request.priority))])
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::hello::models::tests::profile;
	use rstest::rstest;
	use visitcard_http::FormData;

	fn profile_data() -> FormData {
		FormData::new()
			.with_field("name", "Ann")
			.with_field("last_name", "Lee")
			.with_field("date", "1991-02-03")
			.with_field("bio", "")
			.with_field("email", "ann@example.com")
			.with_field("jabber", "ann@jabber.org")
			.with_field("skype", "ann.lee")
			.with_field("other_contact", "  ")
	}

	#[rstest]
	fn test_valid_profile_applies() {
		// Arrange
		let mut person = profile();
		person.bio = Some("old".to_string());
		person.image = Some("imag/old.jpg".to_string());
		let mut form = about_form(&person);
		form.bind(&profile_data());

		// Act
		assert!(form.is_valid(), "{:?}", form.errors());
		apply_about(&form, &mut person);

		// Assert
		assert_eq!(person.name, "Ann");
		assert_eq!(person.last_name, "Lee");
		assert_eq!(person.date.unwrap().to_string(), "1991-02-03");
		assert_eq!(person.bio, None);
		assert_eq!(person.other_contact, None);
	}

	#[rstest]
	fn test_profile_requires_contacts() {
		let mut person = profile();
		person.image = Some("imag/old.jpg".to_string());
		let mut form = about_form(&person);
		form.bind(&FormData::new().with_field("name", "Ann").with_field("email", "nope"));

		assert!(!form.is_valid());
		assert_eq!(form.field_errors("last_name"), ["This field is required."]);
		assert_eq!(form.field_errors("email"), ["Enter a valid email address."]);
		assert_eq!(form.field_errors("date"), ["This field is required."]);
		assert!(form.field_errors("image").is_empty());
	}

	#[rstest]
	#[case(None, vec!["This field is required."])]
	#[case(Some("imag/old.jpg"), vec![])]
	fn test_image_required_until_one_is_stored(
		#[case] stored: Option<&str>,
		#[case] expected: Vec<&str>,
	) {
		// Arrange
		let mut person = profile();
		person.image = stored.map(str::to_string);
		let mut form = about_form(&person);
		form.bind(&profile_data());

		// Act
		let valid = form.is_valid();

		// Assert
		assert_eq!(valid, expected.is_empty());
		assert_eq!(form.field_errors("image"), expected);
	}

	#[rstest]
	fn test_details_form_allows_blank_date() {
		let mut form = about_details_form();
		form.bind(&profile_data().with_field("date", ""));

		assert!(form.is_valid(), "{:?}", form.errors());
		assert_eq!(form.get_date("date"), None);
	}

	#[rstest]
	fn test_initial_round_trips_through_form() {
		// Arrange
		let mut person = profile();
		person.image = Some("imag/old.jpg".to_string());
		let mut form = about_form(&person);
		let data = about_initial(&person)
			.into_iter()
			.fold(FormData::new(), |data, (name, value)| {
				data.with_field(name, value.as_str().unwrap_or_default())
			});

		// Act
		form.bind(&data);

		// Assert
		assert!(form.is_valid(), "{:?}", form.errors());
		let mut copy = About::default();
		apply_about(&form, &mut copy);
		copy.id = person.id;
		copy.image = person.image.clone();
		assert_eq!(copy, person);
	}

	#[rstest]
	#[case("0", None)]
	#[case("9", None)]
	#[case("111", Some("Ensure this value is less than or equal to 9."))]
	#[case("-1", Some("Ensure this value is greater than or equal to 0."))]
	#[case("high", Some("Enter a whole number."))]
	#[case("", Some("This field is required."))]
	fn test_request_priority_range(#[case] raw: &str, #[case] error: Option<&str>) {
		let mut form = request_form();
		form.bind(&FormData::new().with_field("priority", raw));

		let valid = form.is_valid();

		assert_eq!(valid, error.is_none());
		assert_eq!(form.field_errors("priority").first().map(String::as_str), error);
	}
}
