use crate::connection::build_sql;
use crate::error::{DbError, DbResult};
use crate::signals::{PostDelete, PostSave};
use crate::{Database, QuerySet};
use sea_query::{Alias, Expr, ExprTrait, Query, TableCreateStatement, Value};
use sqlx::sqlite::SqliteRow;
use std::fmt;
use std::marker::PhantomData;

/// Name of the integer primary key column every model has
pub const PK_COLUMN: &str = "id";

/// A database table mapped to a Rust struct.
///
/// Implementors list their non-key columns in [`COLUMNS`](Self::COLUMNS);
/// [`to_values`](Self::to_values) must return values in the same order.
/// `Display` is the human readable form used by the admin.
pub trait Model: Clone + fmt::Display + Send + Sync + Sized + 'static {
	/// Name used in messages and audit rows, e.g. `AllRequest`
	const MODEL_NAME: &'static str;
	const TABLE_NAME: &'static str;
	/// Non-primary-key columns
	const COLUMNS: &'static [&'static str];
	/// Default ordering, Django style (`"-id"` for newest first)
	const ORDERING: &'static [&'static str] = &[];

	fn pk(&self) -> Option<i64>;
	fn set_pk(&mut self, pk: i64);
	fn to_values(&self) -> Vec<Value>;
	fn from_row(row: &SqliteRow) -> DbResult<Self>;
	fn create_table() -> TableCreateStatement;
}

/// Table-level operations for a model, like Django's `Model.objects`
pub struct Manager<M: Model> {
	db: Database,
	_marker: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Manager<M> {
	fn clone(&self) -> Self {
		Self::new(self.db.clone())
	}
}

impl<M: Model> Manager<M> {
	pub fn new(db: Database) -> Self {
		Self {
			db,
			_marker: PhantomData,
		}
	}

	pub fn all(&self) -> QuerySet<M> {
		QuerySet::new(self.db.clone())
	}

	pub fn filter(&self, column: &str, value: impl Into<Value>) -> QuerySet<M> {
		self.all().filter(column, value)
	}

	/// Fetch by primary key
	///
	/// # Errors
	///
	/// [`DbError::DoesNotExist`] when no row has that key.
	pub async fn get(&self, pk: i64) -> DbResult<M> {
		self.all().filter(PK_COLUMN, pk).get().await
	}

	pub async fn count(&self) -> DbResult<i64> {
		self.all().count().await
	}

	/// Insert `instance` and return it with its primary key set
	pub async fn create(&self, mut instance: M) -> DbResult<M> {
		self.save(&mut instance).await?;
		Ok(instance)
	}

	/// Insert or update `instance`, then send `post_save`.
	///
	/// An instance without a primary key is inserted. An instance with a key
	/// is updated; if no row has that key it is inserted with it. Returns
	/// whether a row was created.
	///
	/// # Errors
	///
	/// Database failures, or the first failing `post_save` receiver. The row
	/// is already written when a receiver fails.
	pub async fn save(&self, instance: &mut M) -> DbResult<bool> {
		let values = instance.to_values();

		let created = match instance.pk() {
			Some(pk) => {
				let mut stmt = Query::update();
				stmt.table(Alias::new(M::TABLE_NAME));
				for (column, value) in M::COLUMNS.iter().zip(values.iter().cloned()) {
					stmt.value(Alias::new(*column), value);
				}
				stmt.and_where(Expr::col(Alias::new(PK_COLUMN)).eq(pk));

				let result = sqlx::query(&build_sql(&stmt))
					.execute(self.db.pool())
					.await?;
				if result.rows_affected() == 0 {
					self.insert(Some(pk), values).await?;
					true
				} else {
					false
				}
			}
			None => {
				let pk = self.insert(None, values).await?;
				instance.set_pk(pk);
				true
			}
		};

		tracing::debug!(
			model = M::MODEL_NAME,
			id = instance.pk(),
			created,
			"saved instance"
		);

		self.db
			.signals()
			.post_save
			.send(PostSave {
				model_name: M::MODEL_NAME,
				instance_id: instance.pk(),
				created,
				db: self.db.clone(),
			})
			.await?;

		Ok(created)
	}

	async fn insert(&self, pk: Option<i64>, values: Vec<Value>) -> DbResult<i64> {
		let mut columns = Vec::with_capacity(M::COLUMNS.len() + 1);
		let mut row: Vec<Value> = Vec::with_capacity(M::COLUMNS.len() + 1);
		if let Some(pk) = pk {
			columns.push(Alias::new(PK_COLUMN));
			row.push(pk.into());
		}
		columns.extend(M::COLUMNS.iter().map(|column| Alias::new(*column)));
		row.extend(values);

		let mut stmt = Query::insert();
		stmt.into_table(Alias::new(M::TABLE_NAME)).columns(columns);
		stmt.values(row.into_iter().map(Into::into))?;

		let result = sqlx::query(&build_sql(&stmt))
			.execute(self.db.pool())
			.await?;
		Ok(result.last_insert_rowid())
	}

	/// Delete `instance`'s row, then send `post_delete`
	///
	/// # Errors
	///
	/// [`DbError::NotSaved`] for an instance without a primary key.
	pub async fn delete(&self, instance: &M) -> DbResult<()> {
		let pk = instance.pk().ok_or(DbError::NotSaved {
			model: M::MODEL_NAME,
		})?;

		let stmt = Query::delete()
			.from_table(Alias::new(M::TABLE_NAME))
			.and_where(Expr::col(Alias::new(PK_COLUMN)).eq(pk))
			.to_owned();
		sqlx::query(&build_sql(&stmt))
			.execute(self.db.pool())
			.await?;

		tracing::debug!(model = M::MODEL_NAME, id = pk, "deleted instance");

		self.db
			.signals()
			.post_delete
			.send(PostDelete {
				model_name: M::MODEL_NAME,
				instance_id: Some(pk),
				db: self.db.clone(),
			})
			.await?;

		Ok(())
	}
}
