//! Table creation for registered models.

use crate::connection::{build_schema_sql, build_sql};
use crate::error::DbResult;
use crate::registry::ModelInfo;
use crate::{Database, Model};
use sea_query::{Alias, Asterisk, Expr, ExprTrait, Func, Query};
use sqlx::Row;

impl Database {
	/// Create the table for `M` if it does not exist
	pub async fn create_table<M: Model>(&self) -> DbResult<()> {
		self.create_table_for(&ModelInfo::of::<M>("")).await
	}

	async fn create_table_for(&self, info: &ModelInfo) -> DbResult<()> {
		let sql = build_schema_sql(&info.create_table_statement());
		sqlx::query(&sql).execute(self.pool()).await?;
		Ok(())
	}

	/// Create every registered table that is missing.
	///
	/// Returns the tables that were newly created.
	pub async fn migrate(&self) -> DbResult<Vec<&'static str>> {
		let mut created = Vec::new();
		for info in self.registry().models() {
			let existed = self.table_exists(info.table).await?;
			self.create_table_for(&info).await?;
			if !existed {
				tracing::info!(app = info.app_label, table = info.table, "created table");
				created.push(info.table);
			}
		}
		Ok(created)
	}

	pub async fn table_exists(&self, table: &str) -> DbResult<bool> {
		let stmt = Query::select()
			.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
			.from(Alias::new("sqlite_master"))
			.and_where(Expr::col(Alias::new("type")).eq("table"))
			.and_where(Expr::col(Alias::new("name")).eq(table))
			.to_owned();
		let row = sqlx::query(&build_sql(&stmt))
			.fetch_one(self.pool())
			.await?;
		let count: i64 = row.try_get("count")?;
		Ok(count > 0)
	}

	/// Row count for a registered model
	pub async fn count_rows(&self, info: &ModelInfo) -> DbResult<i64> {
		let stmt = Query::select()
			.expr_as(Func::count(Expr::col(Asterisk)), Alias::new("count"))
			.from(Alias::new(info.table))
			.to_owned();
		let row = sqlx::query(&build_sql(&stmt))
			.fetch_one(self.pool())
			.await?;
		Ok(row.try_get("count")?)
	}
}
