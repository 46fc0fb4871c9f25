//! Framework-wide error type.
//!
//! Every handler in the request pipeline returns [`Result`]. The HTTP layer
//! maps each variant to a status code through [`Error::status_code`].

/// Result alias used across the request pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while handling a request
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Requested object does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// Input failed validation
	#[error("Validation error: {0}")]
	Validation(String),

	/// Caller is not authenticated
	#[error("Authentication required: {0}")]
	Authentication(String),

	/// Caller is authenticated but not allowed
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Malformed HTTP input (bad body, bad header, ...)
	#[error("HTTP error: {0}")]
	Http(String),

	/// Database layer failure
	#[error("Database error: {0}")]
	Database(String),

	/// Template lookup or rendering failure
	#[error("Template error: {0}")]
	Template(String),

	/// Serialization or deserialization failure
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Signal receiver failure
	#[error("Signal error: {0}")]
	Signal(String),

	/// Filesystem failure
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Anything else
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code for this error
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_core::Error;
	///
	/// assert_eq!(Error::NotFound("About 7".into()).status_code(), 404);
	/// assert_eq!(Error::Database("locked".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::NotFound(_) => 404,
			Error::Validation(_) | Error::Http(_) => 400,
			Error::Authentication(_) => 401,
			Error::PermissionDenied(_) => 403,
			_ => 500,
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(error: serde_json::Error) -> Self {
		Error::Serialization(error.to_string())
	}
}

impl From<crate::signals::SignalError> for Error {
	fn from(error: crate::signals::SignalError) -> Self {
		Error::Signal(error.to_string())
	}
}
