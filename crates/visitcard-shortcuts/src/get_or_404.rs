//! Lookups that turn "no such row" into a 404.

use crate::error::GetError;
use visitcard_db::{Database, Model};

/// Fetch `M` by primary key
///
/// # Errors
///
/// [`GetError::NotFound`] when no row has that key; other database failures
/// as [`GetError::Database`]. Both convert into the framework error with
/// `?`, so views answer 404 and 500 respectively.
pub async fn get_object_or_404<M: Model>(db: &Database, pk: i64) -> Result<M, GetError> {
	Ok(db.objects::<M>().get(pk).await?)
}

/// Parse a path parameter as a primary key; anything unparsable is a 404
pub fn parse_pk<M: Model>(raw: Option<&str>) -> Result<i64, GetError> {
	raw.and_then(|raw| raw.parse().ok())
		.ok_or(GetError::NotFound(M::MODEL_NAME))
}
