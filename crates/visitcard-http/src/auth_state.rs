//! Authentication state stored in request extensions.

/// Who is making the request, as resolved by the authentication middleware.
///
/// # Example
///
/// ```
/// use visitcard_http::{AuthState, Extensions};
///
/// let extensions = Extensions::new();
/// extensions.insert(AuthState::authenticated(1, "admin", true));
///
/// let state: AuthState = extensions.get().unwrap();
/// assert!(state.is_authenticated());
/// assert_eq!(state.username, "admin");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
	/// Primary key of the user, `None` for anonymous requests
	pub user_id: Option<i64>,
	pub username: String,
	/// Whether the user may use the admin
	pub is_staff: bool,
}

impl AuthState {
	pub fn authenticated(user_id: i64, username: impl Into<String>, is_staff: bool) -> Self {
		Self {
			user_id: Some(user_id),
			username: username.into(),
			is_staff,
		}
	}

	pub fn anonymous() -> Self {
		Self {
			user_id: None,
			username: String::new(),
			is_staff: false,
		}
	}

	pub fn is_authenticated(&self) -> bool {
		self.user_id.is_some()
	}

	pub fn is_anonymous(&self) -> bool {
		!self.is_authenticated()
	}
}

impl Default for AuthState {
	fn default() -> Self {
		Self::anonymous()
	}
}
