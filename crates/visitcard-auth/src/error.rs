use visitcard_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	#[error("Please enter a correct username and password.")]
	InvalidCredentials,
	#[error("This account is inactive.")]
	Inactive,
	#[error("A user with that username already exists.")]
	DuplicateUsername,
	#[error("Password hashing failed: {0}")]
	Hash(String),
	#[error("No session is attached to the request")]
	NoSession,
	#[error(transparent)]
	Database(#[from] DbError),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for visitcard_core::Error {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::Database(db) => db.into(),
			AuthError::InvalidCredentials | AuthError::Inactive => {
				visitcard_core::Error::Authentication(err.to_string())
			}
			AuthError::DuplicateUsername => visitcard_core::Error::Validation(err.to_string()),
			AuthError::Hash(_) | AuthError::NoSession => {
				visitcard_core::Error::Internal(err.to_string())
			}
		}
	}
}
