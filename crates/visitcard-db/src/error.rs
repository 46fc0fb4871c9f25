use visitcard_core::signals::SignalError;

/// Errors raised by the ORM layer
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("{model} matching query does not exist")]
	DoesNotExist { model: &'static str },

	#[error("{model} instance has no primary key")]
	NotSaved { model: &'static str },

	#[error("database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("failed to build query: {0}")]
	Query(String),

	#[error("failed to decode column {column}: {message}")]
	Decode { column: &'static str, message: String },

	#[error("signal receiver failed: {0}")]
	Signal(#[from] SignalError),
}

impl DbError {
	pub fn decode(column: &'static str, message: impl ToString) -> Self {
		Self::Decode {
			column,
			message: message.to_string(),
		}
	}

	pub fn is_does_not_exist(&self) -> bool {
		matches!(self, Self::DoesNotExist { .. })
	}
}

impl From<sea_query::error::Error> for DbError {
	fn from(error: sea_query::error::Error) -> Self {
		Self::Query(error.to_string())
	}
}

impl From<DbError> for visitcard_core::Error {
	fn from(error: DbError) -> Self {
		match error {
			DbError::DoesNotExist { .. } => Self::NotFound(error.to_string()),
			DbError::Signal(e) => Self::Signal(e.to_string()),
			other => Self::Database(other.to_string()),
		}
	}
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_does_not_exist_maps_to_not_found() {
		// Arrange
		let error = DbError::DoesNotExist { model: "About" };

		// Act
		let converted = visitcard_core::Error::from(error);

		// Assert
		assert_eq!(converted.status_code(), 404);
		assert_eq!(
			converted.to_string(),
			"Not found: About matching query does not exist"
		);
	}

	#[rstest]
	fn test_signal_error_keeps_message() {
		let converted = visitcard_core::Error::from(DbError::from(SignalError::new("audit failed")));

		assert_eq!(converted.status_code(), 500);
		assert!(converted.to_string().contains("audit failed"));
	}
}
