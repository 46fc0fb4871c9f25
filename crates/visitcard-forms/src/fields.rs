pub mod char_field;
pub mod date_field;
pub mod datetime_field;
pub mod email_field;
pub mod image_field;
pub mod integer_field;

pub use char_field::CharField;
pub use date_field::DateField;
pub use datetime_field::DateTimeField;
pub use email_field::EmailField;
pub use image_field::ImageField;
pub use integer_field::IntegerField;
