//! The `User` model and its manager helpers.

use crate::error::{AuthError, AuthResult};
use crate::hasher::{UNUSABLE_PASSWORD_PREFIX, check_password, make_password};
use chrono::{DateTime, Utc};
use sea_query::{Alias, ColumnDef, Table, TableCreateStatement, Value};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::fmt;
use visitcard_db::fields::{encode_datetime, get_datetime, get_optional_datetime};
use visitcard_db::{Database, DbResult, Model};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
	pub id: Option<i64>,
	pub username: String,
	pub email: String,
	/// Argon2 PHC string, or `!` for an unusable password
	pub password: String,
	pub is_staff: bool,
	pub is_superuser: bool,
	pub is_active: bool,
	pub date_joined: DateTime<Utc>,
	pub last_login: Option<DateTime<Utc>>,
}

impl User {
	/// An active, unsaved user without a usable password
	pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			id: None,
			username: username.into(),
			email: email.into(),
			password: UNUSABLE_PASSWORD_PREFIX.to_string(),
			is_staff: false,
			is_superuser: false,
			is_active: true,
			date_joined: Utc::now(),
			last_login: None,
		}
	}

	pub fn set_password(&mut self, raw: &str) -> AuthResult<()> {
		self.password = make_password(raw)?;
		Ok(())
	}

	pub fn check_password(&self, raw: &str) -> bool {
		check_password(raw, &self.password)
	}

	pub fn has_usable_password(&self) -> bool {
		!self.password.starts_with(UNUSABLE_PASSWORD_PREFIX)
	}

	/// Create and save a regular user
	pub async fn create_user(
		db: &Database,
		username: &str,
		email: &str,
		password: &str,
	) -> AuthResult<User> {
		Self::insert_unique(db, Self::build(username, email, password)?).await
	}

	/// Create and save a staff superuser
	///
	/// # Errors
	///
	/// [`AuthError::DuplicateUsername`] when the username is taken.
	pub async fn create_superuser(
		db: &Database,
		username: &str,
		email: &str,
		password: &str,
	) -> AuthResult<User> {
		let mut user = Self::build(username, email, password)?;
		user.is_staff = true;
		user.is_superuser = true;
		Self::insert_unique(db, user).await
	}

	fn build(username: &str, email: &str, password: &str) -> AuthResult<User> {
		let mut user = User::new(username, email);
		user.set_password(password)?;
		Ok(user)
	}

	async fn insert_unique(db: &Database, user: User) -> AuthResult<User> {
		if Self::find_by_username(db, &user.username).await?.is_some() {
			return Err(AuthError::DuplicateUsername);
		}
		let user = db.objects::<User>().create(user).await?;
		tracing::info!(username = %user.username, staff = user.is_staff, "created user");
		Ok(user)
	}

	pub async fn find_by_username(db: &Database, username: &str) -> DbResult<Option<User>> {
		db.objects::<User>()
			.filter("username", username)
			.first()
			.await
	}
}

impl fmt::Display for User {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.username)
	}
}

impl Model for User {
	const MODEL_NAME: &'static str = "User";
	const TABLE_NAME: &'static str = "auth_user";
	const COLUMNS: &'static [&'static str] = &[
		"username",
		"email",
		"password",
		"is_staff",
		"is_superuser",
		"is_active",
		"date_joined",
		"last_login",
	];

	fn pk(&self) -> Option<i64> {
		self.id
	}

	fn set_pk(&mut self, pk: i64) {
		self.id = Some(pk);
	}

	fn to_values(&self) -> Vec<Value> {
		vec![
			self.username.clone().into(),
			self.email.clone().into(),
			self.password.clone().into(),
			self.is_staff.into(),
			self.is_superuser.into(),
			self.is_active.into(),
			encode_datetime(&self.date_joined).into(),
			self.last_login.as_ref().map(encode_datetime).into(),
		]
	}

	fn from_row(row: &SqliteRow) -> DbResult<Self> {
		Ok(Self {
			id: Some(row.try_get("id")?),
			username: row.try_get("username")?,
			email: row.try_get("email")?,
			password: row.try_get("password")?,
			is_staff: row.try_get("is_staff")?,
			is_superuser: row.try_get("is_superuser")?,
			is_active: row.try_get("is_active")?,
			date_joined: get_datetime(row, "date_joined")?,
			last_login: get_optional_datetime(row, "last_login")?,
		})
	}

	fn create_table() -> TableCreateStatement {
		Table::create()
			.table(Alias::new(Self::TABLE_NAME))
			.if_not_exists()
			.col(
				ColumnDef::new(Alias::new("id"))
					.integer()
					.not_null()
					.auto_increment()
					.primary_key(),
			)
			.col(
				ColumnDef::new(Alias::new("username"))
					.string_len(150)
					.not_null()
					.unique_key(),
			)
			.col(ColumnDef::new(Alias::new("email")).string_len(254).not_null())
			.col(ColumnDef::new(Alias::new("password")).string_len(128).not_null())
			.col(ColumnDef::new(Alias::new("is_staff")).boolean().not_null())
			.col(ColumnDef::new(Alias::new("is_superuser")).boolean().not_null())
			.col(ColumnDef::new(Alias::new("is_active")).boolean().not_null())
			.col(ColumnDef::new(Alias::new("date_joined")).text().not_null())
			.col(ColumnDef::new(Alias::new("last_login")).text().null())
			.to_owned()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	pub(crate) async fn db() -> Database {
		let db = Database::in_memory().await.unwrap();
		db.registry().register::<User>("auth");
		db.migrate().await.unwrap();
		db
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_superuser(#[future] db: Database) {
		// Act
		let db = db.await;
		let user = User::create_superuser(&db, "admin", "admin@example.com", "pw")
			.await
			.unwrap();

		// Assert
		let stored = db.objects::<User>().get(user.id.unwrap()).await.unwrap();
		assert!(stored.is_staff && stored.is_superuser && stored.is_active);
		assert!(stored.check_password("pw"));
		assert!(!stored.check_password("other"));
		assert_eq!(stored.last_login, None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_duplicate_username_rejected(#[future] db: Database) {
		// Arrange
		let db = db.await;
		User::create_user(&db, "ann", "a@example.com", "pw").await.unwrap();

		// Act
		let result = User::create_user(&db, "ann", "b@example.com", "pw").await;

		// Assert
		assert!(matches!(result, Err(AuthError::DuplicateUsername)));
	}

	#[rstest]
	fn test_new_user_has_unusable_password() {
		let user = User::new("ann", "");

		assert!(!user.has_usable_password());
		assert!(!user.check_password(""));
	}
}
