#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
	#[error("Invalid URL pattern '{pattern}': {reason}")]
	InvalidPattern { pattern: String, reason: String },
	#[error("Reverse for '{0}' not found")]
	NoReverseMatch(String),
	#[error("Reverse for '{name}' is missing parameter '{param}'")]
	MissingParam { name: String, param: String },
	#[error("Value '{value}' is not valid for parameter '{param}'")]
	InvalidParam { param: String, value: String },
}

pub type UrlResult<T> = Result<T, UrlError>;

impl From<UrlError> for visitcard_core::Error {
	fn from(err: UrlError) -> Self {
		visitcard_core::Error::Internal(err.to_string())
	}
}
