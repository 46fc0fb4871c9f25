//! Form handling for visitcard.
//!
//! A [`Form`] is a list of [`FormField`]s. Binding it to submitted
//! [`FormData`](visitcard_http::FormData) and calling [`Form::is_valid`]
//! cleans each field; failures are reported per field with Django-style
//! messages such as `Ensure this value is less than or equal to 9.`.

pub mod field;
pub mod fields;
pub mod form;

pub use field::{FieldError, FieldResult, FormField, Widget, escape_html};
pub use fields::{CharField, DateField, DateTimeField, EmailField, ImageField, IntegerField};
pub use form::{ALL_FIELDS_KEY, Form, FormError, FormResult, pretty_name};
