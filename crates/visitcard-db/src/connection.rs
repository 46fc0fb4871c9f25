use crate::error::DbResult;
use crate::registry::ModelRegistry;
use crate::signals::ModelSignals;
use crate::{Manager, Model};
use sea_query::{QueryStatementWriter, SchemaStatementBuilder, SqliteQueryBuilder};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::fmt;
use std::str::FromStr;

/// Handle to the sqlite database.
///
/// Cloning is cheap: clones share the pool, the model signals and the
/// model registry.
#[derive(Clone)]
pub struct Database {
	pool: SqlitePool,
	signals: ModelSignals,
	registry: ModelRegistry,
}

impl Database {
	/// Connect to `url` (e.g. `sqlite://db.sqlite3`), creating the file if needed
	pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
		let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

		// Every connection to `:memory:` is a separate database, so pin the
		// pool to a single connection that never expires
		let pool = if is_memory_url(url) {
			SqlitePoolOptions::new()
				.max_connections(1)
				.idle_timeout(None)
				.max_lifetime(None)
				.connect_with(options)
				.await?
		} else {
			SqlitePoolOptions::new()
				.max_connections(max_connections.max(1))
				.connect_with(options)
				.await?
		};

		tracing::debug!(url, "connected to database");
		Ok(Self::from_pool(pool))
	}

	/// A private in-memory database
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_db::Database;
	///
	/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
	/// let db = Database::in_memory().await.unwrap();
	/// assert!(db.registry().is_empty());
	/// # });
	/// ```
	pub async fn in_memory() -> DbResult<Self> {
		Self::connect("sqlite::memory:", 1).await
	}

	pub fn from_pool(pool: SqlitePool) -> Self {
		Self {
			pool,
			signals: ModelSignals::new(),
			registry: ModelRegistry::new(),
		}
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	pub fn signals(&self) -> &ModelSignals {
		&self.signals
	}

	pub fn registry(&self) -> &ModelRegistry {
		&self.registry
	}

	/// Manager for model `M`
	pub fn objects<M: Model>(&self) -> Manager<M> {
		Manager::new(self.clone())
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}

impl fmt::Debug for Database {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Database")
			.field("pool_size", &self.pool.size())
			.field("models", &self.registry.len())
			.finish()
	}
}

fn is_memory_url(url: &str) -> bool {
	url.contains(":memory:") || url.contains("mode=memory")
}

/// Render a DML statement for sqlite
pub(crate) fn build_sql<T: QueryStatementWriter>(statement: &T) -> String {
	statement.to_string(SqliteQueryBuilder)
}

/// Render a DDL statement for sqlite
pub(crate) fn build_schema_sql<T: SchemaStatementBuilder>(statement: &T) -> String {
	statement.to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("sqlite::memory:", true)]
	#[case("sqlite:file:test?mode=memory&cache=shared", true)]
	#[case("sqlite://db.sqlite3", false)]
	fn test_is_memory_url(#[case] url: &str, #[case] expected: bool) {
		assert_eq!(is_memory_url(url), expected);
	}

	#[rstest]
	#[tokio::test]
	async fn test_clones_share_signals() {
		// Arrange
		let db = Database::in_memory().await.unwrap();
		let clone = db.clone();

		// Act
		clone
			.signals()
			.post_save
			.connect(|_| async { Ok(()) });

		// Assert
		assert_eq!(db.signals().post_save.receiver_count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_file_database_is_created() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("test.sqlite3");
		let url = format!("sqlite://{}", path.display());

		// Act
		let db = Database::connect(&url, 2).await.unwrap();
		db.close().await;

		// Assert
		assert!(path.exists());
	}
}
