//! Per-model admin behaviour.

use crate::apps::hello::forms::{about_details_form, about_initial, apply_about};
use crate::apps::hello::{About, AllRequest, SignalData};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use visitcard_db::{Database, DbResult, Model};
use visitcard_forms::{CharField, DateTimeField, Form, IntegerField};

/// One line of a change list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeListRow {
	pub id: Option<i64>,
	pub display: String,
	pub columns: Vec<String>,
}

/// What the admin needs to know about a concrete model
pub trait AdminModel: Model {
	/// Column headers of the change list, matching [`list_values`](Self::list_values)
	const LIST_DISPLAY: &'static [&'static str];
	/// Whether the model offers the bulk "clear" action
	const CLEARABLE: bool = false;

	fn list_values(&self) -> Vec<String>;
	fn admin_form() -> Form;
	fn admin_initial(&self) -> HashMap<String, Value>;
	/// A new, unsaved instance for the add form
	fn blank() -> Self;
	/// Copy the cleaned data of a valid [`admin_form`](Self::admin_form)
	fn apply_form(&mut self, form: &Form);
}

/// Object-safe admin operations, so models of different types can sit in
/// one [`AdminSite`](super::AdminSite)
#[async_trait]
pub trait ModelAdmin: Send + Sync {
	fn model_name(&self) -> &'static str;

	/// URL segment, the lowercased model name
	fn slug(&self) -> String {
		self.model_name().to_lowercase()
	}

	fn list_display(&self) -> &'static [&'static str];

	/// Rows per change list page
	fn list_per_page(&self) -> usize {
		25
	}

	fn clearable(&self) -> bool;
	fn form(&self) -> Form;

	async fn count(&self, db: &Database) -> DbResult<i64>;
	async fn rows(&self, db: &Database, limit: u64, offset: u64) -> DbResult<Vec<ChangeListRow>>;
	/// Display string and form initial values of row `pk`
	async fn initial(&self, db: &Database, pk: i64) -> DbResult<(String, HashMap<String, Value>)>;
	/// Create (`pk` is `None`) or update a row from a valid form; returns its id
	async fn save(&self, db: &Database, pk: Option<i64>, form: &Form) -> DbResult<i64>;
	/// Delete row `pk`, returning its display string
	async fn delete(&self, db: &Database, pk: i64) -> DbResult<String>;
	/// Delete every row without sending signals
	async fn clear(&self, db: &Database) -> DbResult<u64>;
}

/// [`ModelAdmin`] implementation for any [`AdminModel`]
pub struct ModelAdminFor<M> {
	_marker: PhantomData<fn() -> M>,
}

impl<M> Default for ModelAdminFor<M> {
	fn default() -> Self {
		Self {
			_marker: PhantomData,
		}
	}
}

#[async_trait]
impl<M: AdminModel> ModelAdmin for ModelAdminFor<M> {
	fn model_name(&self) -> &'static str {
		M::MODEL_NAME
	}

	fn list_display(&self) -> &'static [&'static str] {
		M::LIST_DISPLAY
	}

	fn clearable(&self) -> bool {
		M::CLEARABLE
	}

	fn form(&self) -> Form {
		M::admin_form()
	}

	async fn count(&self, db: &Database) -> DbResult<i64> {
		db.objects::<M>().count().await
	}

	async fn rows(&self, db: &Database, limit: u64, offset: u64) -> DbResult<Vec<ChangeListRow>> {
		let rows = db
			.objects::<M>()
			.all()
			.order_by(&["-id"])
			.limit(limit)
			.offset(offset)
			.all()
			.await?;
		Ok(rows
			.iter()
			.map(|row| ChangeListRow {
				id: row.pk(),
				display: row.to_string(),
				columns: row.list_values(),
			})
			.collect())
	}

	async fn initial(&self, db: &Database, pk: i64) -> DbResult<(String, HashMap<String, Value>)> {
		let instance = db.objects::<M>().get(pk).await?;
		Ok((instance.to_string(), instance.admin_initial()))
	}

	async fn save(&self, db: &Database, pk: Option<i64>, form: &Form) -> DbResult<i64> {
		let manager = db.objects::<M>();
		let mut instance = match pk {
			Some(pk) => manager.get(pk).await?,
			None => M::blank(),
		};
		instance.apply_form(form);
		manager.save(&mut instance).await?;
		instance.pk().ok_or(visitcard_db::DbError::NotSaved {
			model: M::MODEL_NAME,
		})
	}

	async fn delete(&self, db: &Database, pk: i64) -> DbResult<String> {
		let manager = db.objects::<M>();
		let instance = manager.get(pk).await?;
		manager.delete(&instance).await?;
		Ok(instance.to_string())
	}

	async fn clear(&self, db: &Database) -> DbResult<u64> {
		db.objects::<M>().all().bulk_delete().await
	}
}

impl AdminModel for About {
	const LIST_DISPLAY: &'static [&'static str] = &["Name", "Last name", "Email"];

	fn list_values(&self) -> Vec<String> {
		vec![self.name.clone(), self.last_name.clone(), self.email.clone()]
	}

	fn admin_form() -> Form {
		about_details_form()
	}

	fn admin_initial(&self) -> HashMap<String, Value> {
		about_initial(self)
	}

	fn blank() -> Self {
		About::default()
	}

	fn apply_form(&mut self, form: &Form) {
		apply_about(form, self);
	}
}

impl AdminModel for AllRequest {
	const LIST_DISPLAY: &'static [&'static str] = &["Date", "Method", "Path", "Priority"];

	fn list_values(&self) -> Vec<String> {
		vec![
			self.formatted_date(),
			self.method.clone(),
			self.path.clone(),
			self.priority.to_string(),
		]
	}

	fn admin_form() -> Form {
		Form::new()
			.with_field(
				IntegerField::new("priority")
					.required()
					.with_min_value(0)
					.with_max_value(9),
			)
			.with_field(CharField::new("method").required().with_max_length(50))
			.with_field(CharField::new("path").required().with_max_length(200))
			.with_field(DateTimeField::new("date"))
	}

	fn admin_initial(&self) -> HashMap<String, Value> {
		HashMap::from([
			("priority".to_string(), Value::from(self.priority)),
			("method".to_string(), Value::from(self.method.as_str())),
			("path".to_string(), Value::from(self.path.as_str())),
			(
				"date".to_string(),
				Value::from(self.date.format("%Y-%m-%d %H:%M:%S").to_string()),
			),
		])
	}

	fn blank() -> Self {
		AllRequest::new("GET", "/")
	}

	fn apply_form(&mut self, form: &Form) {
		self.priority = form.get_i64("priority").unwrap_or_default();
		self.method = form.get_str("method").unwrap_or_default().to_string();
		self.path = form.get_str("path").unwrap_or_default().to_string();
		// Left blank, the logged time is kept
		if let Some(date) = form.get_datetime("date") {
			self.date = date;
		}
	}
}

impl AdminModel for SignalData {
	const LIST_DISPLAY: &'static [&'static str] = &["Date", "Message"];
	const CLEARABLE: bool = true;

	fn list_values(&self) -> Vec<String> {
		vec![
			self.date.format("%d/%b/%Y %H:%M:%S").to_string(),
			self.message.clone(),
		]
	}

	fn admin_form() -> Form {
		Form::new().with_field(CharField::new("message").required().textarea())
	}

	fn admin_initial(&self) -> HashMap<String, Value> {
		HashMap::from([("message".to_string(), Value::from(self.message.as_str()))])
	}

	fn blank() -> Self {
		SignalData::new("")
	}

	fn apply_form(&mut self, form: &Form) {
		self.message = form.get_str("message").unwrap_or_default().to_string();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::hello::models::tests::db;
	use rstest::rstest;
	use visitcard_http::FormData;

	#[rstest]
	#[tokio::test]
	async fn test_save_creates_then_updates(#[future] db: Database) {
		// Arrange
		let db = db.await;
		let admin = ModelAdminFor::<AllRequest>::default();
		let mut form = admin.form();
		form.bind(
			&FormData::new()
				.with_field("priority", "1")
				.with_field("method", "GET")
				.with_field("path", "/x/"),
		);
		assert!(form.is_valid());

		// Act
		let id = admin.save(&db, None, &form).await.unwrap();
		let again = admin.save(&db, Some(id), &form).await.unwrap();

		// Assert
		assert_eq!(id, again);
		assert_eq!(admin.count(&db).await.unwrap(), 1);
		let rows = admin.rows(&db, 25, 0).await.unwrap();
		assert_eq!(rows[0].display, format!("Request - {id}"));
		assert_eq!(rows[0].columns[1..], ["GET", "/x/", "1"]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_request_date_can_be_corrected(#[future] db: Database) {
		// Arrange
		let db = db.await;
		let admin = ModelAdminFor::<AllRequest>::default();
		let mut form = admin.form();
		form.bind(
			&FormData::new()
				.with_field("priority", "0")
				.with_field("method", "POST")
				.with_field("path", "/edit/1/")
				.with_field("date", "2024-02-29 13:45:00"),
		);
		assert!(form.is_valid());

		// Act
		let id = admin.save(&db, None, &form).await.unwrap();

		// Assert
		let (_, initial) = admin.initial(&db, id).await.unwrap();
		assert_eq!(initial["date"], "2024-02-29 13:45:00");
	}

	#[rstest]
	#[tokio::test]
	async fn test_delete_missing_row_is_does_not_exist(#[future] db: Database) {
		let db = db.await;
		let admin = ModelAdminFor::<About>::default();

		let result = admin.delete(&db, 42).await;

		assert!(matches!(result, Err(e) if e.is_does_not_exist()));
	}

	#[rstest]
	fn test_only_audit_log_is_clearable() {
		assert!(ModelAdminFor::<SignalData>::default().clearable());
		assert!(!ModelAdminFor::<AllRequest>::default().clearable());
		assert_eq!(ModelAdminFor::<SignalData>::default().slug(), "signaldata");
	}
}
