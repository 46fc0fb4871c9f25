//! Profile, request log and audit log models.

use chrono::{DateTime, NaiveDate, Utc};
use sea_query::{Alias, ColumnDef, Table, TableCreateStatement, Value};
use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::fmt;
use visitcard_db::fields::{encode_date, encode_datetime, get_datetime, get_optional_date};
use visitcard_db::{DbResult, Model};

/// Format used for request timestamps in listings and the AJAX feed
pub const REQUEST_DATE_FORMAT: &str = "%d/%b/%Y %H:%M:%S";

fn id_column() -> ColumnDef {
	ColumnDef::new(Alias::new("id"))
		.integer()
		.not_null()
		.auto_increment()
		.primary_key()
		.to_owned()
}

/// The site owner's profile; the first row by id is the one shown
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct About {
	pub id: Option<i64>,
	pub name: String,
	pub last_name: String,
	/// Date of birth
	pub date: Option<NaiveDate>,
	pub bio: Option<String>,
	pub email: String,
	pub jabber: String,
	pub skype: String,
	pub other_contact: Option<String>,
	/// Path relative to the media root, e.g. `imag/3f2a.jpg`
	pub image: Option<String>,
}

impl fmt::Display for About {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.last_name)
	}
}

impl Model for About {
	const MODEL_NAME: &'static str = "About";
	const TABLE_NAME: &'static str = "hello_about";
	const COLUMNS: &'static [&'static str] = &[
		"name",
		"last_name",
		"date",
		"bio",
		"email",
		"jabber",
		"skype",
		"other_contact",
		"image",
	];
	const ORDERING: &'static [&'static str] = &["id"];

	fn pk(&self) -> Option<i64> {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = Some(pk);
	}

	fn to_values(&self) -> Vec<Value> {
		vec![
			self.name.clone().into(),
			self.last_name.clone().into(),
			self.date.as_ref().map(encode_date).into(),
			self.bio.clone().into(),
			self.email.clone().into(),
			self.jabber.clone().into(),
			self.skype.clone().into(),
			self.other_contact.clone().into(),
			self.image.clone().into(),
		]
	}

	fn from_row(row: &SqliteRow) -> DbResult<Self> {
		Ok(Self {
			id: Some(row.try_get("id")?),
			name: row.try_get("name")?,
			last_name: row.try_get("last_name")?,
			date: get_optional_date(row, "date")?,
			bio: row.try_get("bio")?,
			email: row.try_get("email")?,
			jabber: row.try_get("jabber")?,
			skype: row.try_get("skype")?,
			other_contact: row.try_get("other_contact")?,
			image: row.try_get("image")?,
		})
	}

	fn create_table() -> TableCreateStatement {
		Table::create()
			.table(Alias::new(Self::TABLE_NAME))
			.if_not_exists()
			.col(id_column())
			.col(ColumnDef::new(Alias::new("name")).string_len(200).not_null())
			.col(ColumnDef::new(Alias::new("last_name")).string_len(200).not_null())
			.col(ColumnDef::new(Alias::new("date")).text().null())
			.col(ColumnDef::new(Alias::new("bio")).text().null())
			.col(ColumnDef::new(Alias::new("email")).string_len(100).not_null())
			.col(ColumnDef::new(Alias::new("jabber")).string_len(100).not_null())
			.col(ColumnDef::new(Alias::new("skype")).string_len(100).not_null())
			.col(ColumnDef::new(Alias::new("other_contact")).text().null())
			.col(ColumnDef::new(Alias::new("image")).string_len(100).null())
			.to_owned()
	}
}

/// One logged HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct AllRequest {
	pub id: Option<i64>,
	/// 0 is low, 1 is high; the form allows 0..=9
	pub priority: i64,
	pub date: DateTime<Utc>,
	pub method: String,
	pub path: String,
}

impl AllRequest {
	pub const PATH_MAX_LENGTH: usize = 200;

	/// A low priority entry timestamped now; `path` is cut to 200 characters
	pub fn new(method: impl Into<String>, path: &str) -> Self {
		Self {
			id: None,
			priority: 0,
			date: Utc::now(),
			method: method.into(),
			path: path.chars().take(Self::PATH_MAX_LENGTH).collect(),
		}
	}

	pub fn with_priority(mut self, priority: i64) -> Self {
		self.priority = priority;
		self
	}

	pub fn formatted_date(&self) -> String {
		self.date.format(REQUEST_DATE_FORMAT).to_string()
	}
}

impl fmt::Display for AllRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.id {
			Some(id) => write!(f, "Request - {id}"),
			None => f.write_str("Request - None"),
		}
	}
}

impl Model for AllRequest {
	const MODEL_NAME: &'static str = "AllRequest";
	const TABLE_NAME: &'static str = "hello_allrequest";
	const COLUMNS: &'static [&'static str] = &["priority", "date", "method", "path"];
	const ORDERING: &'static [&'static str] = &["-id"];

	fn pk(&self) -> Option<i64> {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = Some(pk);
	}

	fn to_values(&self) -> Vec<Value> {
		vec![
			self.priority.into(),
			encode_datetime(&self.date).into(),
			self.method.clone().into(),
			self.path.clone().into(),
		]
	}

	fn from_row(row: &SqliteRow) -> DbResult<Self> {
		Ok(Self {
			id: Some(row.try_get("id")?),
			priority: row.try_get("priority")?,
			date: get_datetime(row, "date")?,
			method: row.try_get("method")?,
			path: row.try_get("path")?,
		})
	}

	fn create_table() -> TableCreateStatement {
		Table::create()
			.table(Alias::new(Self::TABLE_NAME))
			.if_not_exists()
			.col(id_column())
			.col(
				ColumnDef::new(Alias::new("priority"))
					.integer()
					.not_null()
					.default(0),
			)
			.col(ColumnDef::new(Alias::new("date")).text().not_null())
			.col(ColumnDef::new(Alias::new("method")).string_len(50).not_null())
			.col(ColumnDef::new(Alias::new("path")).string_len(200).not_null())
			.to_owned()
	}
}

/// Audit row written by the signal receivers in [`super::signals`]
#[derive(Debug, Clone, PartialEq)]
pub struct SignalData {
	pub id: Option<i64>,
	pub date: DateTime<Utc>,
	pub message: String,
}

impl SignalData {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			id: None,
			date: Utc::now(),
			message: message.into(),
		}
	}
}

impl fmt::Display for SignalData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl Model for SignalData {
	const MODEL_NAME: &'static str = "SignalData";
	const TABLE_NAME: &'static str = "hello_signaldata";
	const COLUMNS: &'static [&'static str] = &["date", "message"];
	const ORDERING: &'static [&'static str] = &["-id"];

	fn pk(&self) -> Option<i64> {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = Some(pk);
	}

	fn to_values(&self) -> Vec<Value> {
		vec![
			encode_datetime(&self.date).into(),
			self.message.clone().into(),
		]
	}

	fn from_row(row: &SqliteRow) -> DbResult<Self> {
		Ok(Self {
			id: Some(row.try_get("id")?),
			date: get_datetime(row, "date")?,
			message: row.try_get("message")?,
		})
	}

	fn create_table() -> TableCreateStatement {
		Table::create()
			.table(Alias::new(Self::TABLE_NAME))
			.if_not_exists()
			.col(id_column())
			.col(ColumnDef::new(Alias::new("date")).text().not_null())
			.col(ColumnDef::new(Alias::new("message")).text().not_null())
			.to_owned()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use visitcard_db::Database;

	#[fixture]
	pub(crate) async fn db() -> Database {
		let db = Database::in_memory().await.unwrap();
		crate::apps::register_models(&db);
		db.migrate().await.unwrap();
		db
	}

	pub(crate) fn profile() -> About {
		About {
			name: "Volodymyr".to_string(),
			last_name: "Shevchenko".to_string(),
			date: NaiveDate::from_ymd_opt(1990, 5, 17),
			email: "vova@example.com".to_string(),
			jabber: "vova@jabber.org".to_string(),
			skype: "vova.s".to_string(),
			..About::default()
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_about_round_trips_nullable_columns(#[future] db: Database) {
		// Arrange
		let db = db.await;

		// Act
		let saved = db.objects::<About>().create(profile()).await.unwrap();
		let loaded = db.objects::<About>().get(saved.id.unwrap()).await.unwrap();

		// Assert
		assert_eq!(loaded, saved);
		assert_eq!(loaded.bio, None);
		assert_eq!(loaded.to_string(), "Shevchenko");
	}

	#[rstest]
	fn test_request_display_and_truncation() {
		// Arrange
		let long_path = format!("/{}", "a".repeat(300));

		// Act
		let mut request = AllRequest::new("GET", &long_path);

		// Assert
		assert_eq!(request.path.chars().count(), AllRequest::PATH_MAX_LENGTH);
		assert_eq!(request.to_string(), "Request - None");
		request.id = Some(7);
		assert_eq!(request.to_string(), "Request - 7");
	}

	#[rstest]
	fn test_request_date_format() {
		let mut request = AllRequest::new("GET", "/");
		request.date = DateTime::parse_from_rfc3339("2015-03-09T07:05:01Z")
			.unwrap()
			.with_timezone(&Utc);

		assert_eq!(request.formatted_date(), "09/Mar/2015 07:05:01");
	}

	#[rstest]
	#[tokio::test]
	async fn test_requests_default_to_newest_first(#[future] db: Database) {
		// Arrange
		let db = db.await;
		for path in ["/a/", "/b/", "/c/"] {
			db.objects::<AllRequest>()
				.create(AllRequest::new("GET", path))
				.await
				.unwrap();
		}

		// Act
		let paths: Vec<String> = db
			.objects::<AllRequest>()
			.all()
			.all()
			.await
			.unwrap()
			.into_iter()
			.map(|request| request.path)
			.collect();

		// Assert
		assert_eq!(paths, ["/c/", "/b/", "/a/"]);
	}
}
