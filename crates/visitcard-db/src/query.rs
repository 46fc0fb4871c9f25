use crate::connection::build_sql;
use crate::error::{DbError, DbResult};
use crate::{Database, Model, PK_COLUMN};
use sea_query::{
	Alias, Asterisk, DeleteStatement, Expr, ExprTrait, Func, Order, Query, SelectStatement, Value,
};
use sqlx::Row;
use std::marker::PhantomData;

/// A lazy, chainable query over one model's table.
///
/// Nothing touches the database until one of the async terminal methods
/// (`all`, `first`, `get`, `count`, `exists`, `bulk_delete`) is awaited.
pub struct QuerySet<M: Model> {
	db: Database,
	filters: Vec<(String, Value)>,
	ordering: Option<Vec<String>>,
	limit: Option<u64>,
	offset: Option<u64>,
	_marker: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for QuerySet<M> {
	fn clone(&self) -> Self {
		Self {
			db: self.db.clone(),
			filters: self.filters.clone(),
			ordering: self.ordering.clone(),
			limit: self.limit,
			offset: self.offset,
			_marker: PhantomData,
		}
	}
}

impl<M: Model> QuerySet<M> {
	pub fn new(db: Database) -> Self {
		Self {
			db,
			filters: Vec::new(),
			ordering: None,
			limit: None,
			offset: None,
			_marker: PhantomData,
		}
	}

	/// Keep rows where `column = value`; repeated calls are ANDed
	pub fn filter(mut self, column: &str, value: impl Into<Value>) -> Self {
		self.filters.push((column.to_string(), value.into()));
		self
	}

	/// Replace the model's default ordering; prefix a column with `-` for
	/// descending order
	pub fn order_by(mut self, fields: &[&str]) -> Self {
		self.ordering = Some(fields.iter().map(|field| field.to_string()).collect());
		self
	}

	pub fn limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	pub fn offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);
		self
	}

	fn select_statement(&self) -> SelectStatement {
		let mut stmt = Query::select();
		stmt.column(Alias::new(PK_COLUMN))
			.columns(M::COLUMNS.iter().map(|column| Alias::new(*column)))
			.from(Alias::new(M::TABLE_NAME));

		for (column, value) in &self.filters {
			stmt.and_where(Expr::col(Alias::new(column.as_str())).eq(value.clone()));
		}

		let ordering: Vec<String> = match &self.ordering {
			Some(ordering) => ordering.clone(),
			None => M::ORDERING.iter().map(|field| field.to_string()).collect(),
		};
		for field in &ordering {
			match field.strip_prefix('-') {
				Some(column) => stmt.order_by(Alias::new(column), Order::Desc),
				None => stmt.order_by(Alias::new(field.as_str()), Order::Asc),
			};
		}

		if let Some(limit) = self.limit {
			stmt.limit(limit);
		}
		if let Some(offset) = self.offset {
			stmt.offset(offset);
		}
		stmt
	}

	/// Fetch every matching row
	pub async fn all(&self) -> DbResult<Vec<M>> {
		let sql = build_sql(&self.select_statement());
		let rows = sqlx::query(&sql).fetch_all(self.db.pool()).await?;
		rows.iter().map(M::from_row).collect()
	}

	/// First row in the current ordering, if any
	pub async fn first(&self) -> DbResult<Option<M>> {
		let sql = build_sql(&self.clone().limit(1).select_statement());
		let row = sqlx::query(&sql).fetch_optional(self.db.pool()).await?;
		row.as_ref().map(M::from_row).transpose()
	}

	/// The single matching row
	///
	/// # Errors
	///
	/// [`DbError::DoesNotExist`] when nothing matches.
	pub async fn get(&self) -> DbResult<M> {
		self.first().await?.ok_or(DbError::DoesNotExist {
			model: M::MODEL_NAME,
		})
	}

	/// Number of matching rows, ignoring limit and offset
	pub async fn count(&self) -> DbResult<i64> {
		let mut stmt = Query::select();
		stmt.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
			.from(Alias::new(M::TABLE_NAME));
		for (column, value) in &self.filters {
			stmt.and_where(Expr::col(Alias::new(column.as_str())).eq(value.clone()));
		}

		let row = sqlx::query(&build_sql(&stmt))
			.fetch_one(self.db.pool())
			.await?;
		Ok(row.try_get("count")?)
	}

	pub async fn exists(&self) -> DbResult<bool> {
		Ok(self.count().await? > 0)
	}

	/// Delete every matching row in one statement.
	///
	/// No `post_delete` signals are sent. Returns the number of rows removed.
	pub async fn bulk_delete(&self) -> DbResult<u64> {
		let mut stmt: DeleteStatement = Query::delete();
		stmt.from_table(Alias::new(M::TABLE_NAME));
		for (column, value) in &self.filters {
			stmt.and_where(Expr::col(Alias::new(column.as_str())).eq(value.clone()));
		}

		let result = sqlx::query(&build_sql(&stmt))
			.execute(self.db.pool())
			.await?;
		tracing::debug!(
			model = M::MODEL_NAME,
			rows = result.rows_affected(),
			"bulk deleted rows"
		);
		Ok(result.rows_affected())
	}
}
