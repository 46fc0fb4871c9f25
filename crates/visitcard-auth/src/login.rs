//! Credential checks and session login/logout.

use crate::error::{AuthError, AuthResult};
use crate::session::{SESSION_KEY_USER_ID, Session};
use crate::user::User;
use chrono::Utc;
use visitcard_db::Database;
use visitcard_http::{AuthState, Request};

/// Look up `username` and check `password`.
///
/// # Errors
///
/// [`AuthError::InvalidCredentials`] for an unknown user or a wrong
/// password, [`AuthError::Inactive`] for a deactivated account.
pub async fn authenticate(db: &Database, username: &str, password: &str) -> AuthResult<User> {
	let Some(user) = User::find_by_username(db, username).await? else {
		// Hash anyway so unknown usernames take as long as wrong passwords
		let _ = crate::hasher::make_password(password);
		return Err(AuthError::InvalidCredentials);
	};
	if !user.check_password(password) {
		tracing::info!(username, "rejected login: bad password");
		return Err(AuthError::InvalidCredentials);
	}
	if !user.is_active {
		return Err(AuthError::Inactive);
	}
	Ok(user)
}

/// Log `user` in on `request`'s session.
///
/// The session key is rotated, `last_login` is saved and the request's
/// [`AuthState`] is updated for the rest of the handler.
pub async fn login(request: &Request, db: &Database, user: &mut User) -> AuthResult<()> {
	let session = Session::from_request(request).ok_or(AuthError::NoSession)?;
	let user_id = user.id.ok_or(AuthError::InvalidCredentials)?;

	session.cycle_key();
	session.set(SESSION_KEY_USER_ID, user_id);

	user.last_login = Some(Utc::now());
	db.objects::<User>().save(user).await?;

	request.extensions.insert(AuthState::authenticated(
		user_id,
		user.username.clone(),
		user.is_staff,
	));
	request.extensions.insert(user.clone());
	tracing::info!(username = %user.username, "user logged in");
	Ok(())
}

/// Flush the session and mark the request anonymous
pub fn logout(request: &Request) {
	if let Some(session) = Session::from_request(request) {
		session.flush();
	}
	request.extensions.remove::<User>();
	request.extensions.insert(AuthState::anonymous());
}

/// Only same-site absolute paths are allowed as a post-login target
///
/// # Examples
///
/// ```
/// use visitcard_auth::login::safe_redirect_target;
///
/// assert_eq!(safe_redirect_target(Some("/edit/1/")), "/edit/1/");
/// assert_eq!(safe_redirect_target(Some("//evil.example/")), "/");
/// assert_eq!(safe_redirect_target(Some("https://evil.example/")), "/");
/// assert_eq!(safe_redirect_target(None), "/");
/// ```
pub fn safe_redirect_target(next: Option<&str>) -> &str {
	match next {
		Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
			path
		}
		_ => "/",
	}
}
