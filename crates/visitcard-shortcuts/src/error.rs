use visitcard_db::DbError;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("Template not found: {0}")]
	NotFound(String),
	#[error("Template rendering failed: {0}")]
	Render(String),
	#[error("Template loading failed: {0}")]
	Load(String),
}

impl From<TemplateError> for visitcard_core::Error {
	fn from(err: TemplateError) -> Self {
		visitcard_core::Error::Template(err.to_string())
	}
}

/// Error type for `get_object_or_404`
#[derive(Debug, thiserror::Error)]
pub enum GetError {
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("Database error: {0}")]
	Database(#[source] DbError),
}

impl From<DbError> for GetError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::DoesNotExist { model } => GetError::NotFound(model),
			other => GetError::Database(other),
		}
	}
}

impl From<GetError> for visitcard_core::Error {
	fn from(err: GetError) -> Self {
		match err {
			GetError::NotFound(_) => visitcard_core::Error::NotFound(err.to_string()),
			GetError::Database(db) => db.into(),
		}
	}
}
