use crate::session::{SESSION_KEY_USER_ID, Session};
use crate::user::User;
use async_trait::async_trait;
use std::sync::Arc;
use visitcard_db::Database;
use visitcard_http::{AuthState, Handler, Middleware, Request, Response, Result};

/// Resolves the session's user and stores an [`AuthState`] (and the
/// [`User`] itself, when there is one) in the request extensions.
///
/// Must run inside [`SessionMiddleware`](crate::session::SessionMiddleware).
/// A session pointing at a missing or inactive user is treated as
/// anonymous.
pub struct AuthenticationMiddleware {
	db: Database,
}

impl AuthenticationMiddleware {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	async fn resolve(&self, request: &Request) -> Option<User> {
		let session = Session::from_request(request)?;
		let user_id = session.get(SESSION_KEY_USER_ID)?.as_i64()?;
		match self.db.objects::<User>().get(user_id).await {
			Ok(user) if user.is_active => Some(user),
			Ok(_) => None,
			Err(e) if e.is_does_not_exist() => None,
			Err(e) => {
				tracing::error!(error = %e, user_id, "failed to load session user");
				None
			}
		}
	}
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let state = match self.resolve(&request).await {
			Some(user) => {
				let state = AuthState::authenticated(
					user.id.unwrap_or_default(),
					user.username.clone(),
					user.is_staff,
				);
				request.extensions.insert(user);
				state
			}
			None => AuthState::anonymous(),
		};
		request.extensions.insert(state);
		next.handle(request).await
	}
}

/// Auth state of `request`, anonymous when the middleware did not run
pub fn auth_state(request: &Request) -> AuthState {
	request.extensions.get::<AuthState>().unwrap_or_default()
}

/// The logged-in user, if any
pub fn current_user(request: &Request) -> Option<User> {
	request.extensions.get::<User>()
}
