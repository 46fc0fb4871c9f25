//! Cookie-keyed server-side sessions.
//!
//! [`SessionMiddleware`] loads the session named by the request cookie into
//! a [`Session`] handle stored in the request extensions. Views read and
//! write it through that handle; after the handler returns, a modified
//! session is written back to the [`SessionStore`] and the cookie is
//! refreshed.

use async_trait::async_trait;
use hyper::header::SET_COOKIE;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;
use visitcard_http::{Handler, Middleware, Request, Response, Result};

/// Session key holding the authenticated user's id
pub const SESSION_KEY_USER_ID: &str = "_auth_user_id";

#[derive(Debug, Clone)]
struct StoredSession {
	data: HashMap<String, Value>,
	expires_at: Instant,
}

/// In-memory session storage keyed by uuid v4 strings.
///
/// Expired entries are dropped when they are next looked up, and swept
/// from the whole store on every save.
#[derive(Debug, Default)]
pub struct SessionStore {
	sessions: RwLock<HashMap<String, StoredSession>>,
}

impl SessionStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_key(&self) -> String {
		Uuid::new_v4().to_string()
	}

	/// Data for `key`, or `None` when unknown or expired
	pub fn load(&self, key: &str) -> Option<HashMap<String, Value>> {
		let expired = {
			let sessions = self.sessions.read();
			let stored = sessions.get(key)?;
			if stored.expires_at > Instant::now() {
				return Some(stored.data.clone());
			}
			true
		};
		if expired {
			self.sessions.write().remove(key);
			tracing::debug!("evicted expired session");
		}
		None
	}

	pub fn save(&self, key: &str, data: HashMap<String, Value>, ttl: Duration) {
		let now = Instant::now();
		let mut sessions = self.sessions.write();
		let before = sessions.len();
		sessions.retain(|_, stored| stored.expires_at > now);
		let swept = before - sessions.len();
		if swept > 0 {
			tracing::debug!(swept, "evicted expired sessions");
		}
		sessions.insert(
			key.to_string(),
			StoredSession {
				data,
				expires_at: now + ttl,
			},
		);
	}

	pub fn delete(&self, key: &str) {
		self.sessions.write().remove(key);
	}

	pub fn exists(&self, key: &str) -> bool {
		self.load(key).is_some()
	}

	pub fn len(&self) -> usize {
		self.sessions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.read().is_empty()
	}
}

#[derive(Debug, Default)]
struct SessionState {
	key: Option<String>,
	data: HashMap<String, Value>,
	modified: bool,
	/// Keys to remove from the store when the response is written
	retired_keys: Vec<String>,
}

/// Per-request session handle.
///
/// Clones share the same state, so a view can take it out of the request
/// extensions and the middleware still sees its writes.
#[derive(Debug, Clone, Default)]
pub struct Session {
	state: Arc<Mutex<SessionState>>,
}

impl Session {
	/// An empty session that has never been stored
	pub fn new() -> Self {
		Self::default()
	}

	fn loaded(key: String, data: HashMap<String, Value>) -> Self {
		Self {
			state: Arc::new(Mutex::new(SessionState {
				key: Some(key),
				data,
				..SessionState::default()
			})),
		}
	}

	/// The session handle attached by [`SessionMiddleware`]
	pub fn from_request(request: &Request) -> Option<Self> {
		request.extensions.get::<Session>()
	}

	pub fn key(&self) -> Option<String> {
		self.state.lock().key.clone()
	}

	pub fn get(&self, key: &str) -> Option<Value> {
		self.state.lock().data.get(key).cloned()
	}

	pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
		let mut state = self.state.lock();
		state.data.insert(key.into(), value.into());
		state.modified = true;
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		let mut state = self.state.lock();
		let removed = state.data.remove(key);
		if removed.is_some() {
			state.modified = true;
		}
		removed
	}

	pub fn contains(&self, key: &str) -> bool {
		self.state.lock().data.contains_key(key)
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().data.is_empty()
	}

	pub fn is_modified(&self) -> bool {
		self.state.lock().modified
	}

	/// Keep the data under a fresh key; the old key stops working
	pub fn cycle_key(&self) {
		let mut state = self.state.lock();
		if let Some(old) = state.key.take() {
			state.retired_keys.push(old);
		}
		state.modified = true;
	}

	/// Drop all data and the key
	pub fn flush(&self) {
		let mut state = self.state.lock();
		if let Some(old) = state.key.take() {
			state.retired_keys.push(old);
		}
		state.data.clear();
		state.modified = true;
	}
}

/// Cookie attributes and lifetime for sessions
#[derive(Debug, Clone)]
pub struct SessionConfig {
	pub cookie_name: String,
	pub ttl: Duration,
	pub secure: bool,
	pub http_only: bool,
	pub same_site: Option<String>,
	pub path: String,
}

impl SessionConfig {
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use visitcard_auth::session::SessionConfig;
	///
	/// let config = SessionConfig::new("sessionid", Duration::from_secs(3600));
	/// assert_eq!(config.path, "/");
	/// assert!(config.http_only);
	/// assert!(!config.secure);
	/// ```
	pub fn new(cookie_name: impl Into<String>, ttl: Duration) -> Self {
		Self {
			cookie_name: cookie_name.into(),
			ttl,
			secure: false,
			http_only: true,
			same_site: Some("Lax".to_string()),
			path: "/".to_string(),
		}
	}

	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}
}

impl Default for SessionConfig {
	fn default() -> Self {
		// Two weeks
		Self::new("sessionid", Duration::from_secs(1_209_600))
	}
}

/// Attaches a [`Session`] to every request and persists it afterwards
pub struct SessionMiddleware {
	config: SessionConfig,
	store: Arc<SessionStore>,
}

impl SessionMiddleware {
	pub fn new(config: SessionConfig) -> Self {
		Self::with_store(config, Arc::new(SessionStore::new()))
	}

	pub fn with_store(config: SessionConfig, store: Arc<SessionStore>) -> Self {
		Self { config, store }
	}

	pub fn store(&self) -> &Arc<SessionStore> {
		&self.store
	}

	fn load_session(&self, request: &Request) -> Session {
		request
			.cookie(&self.config.cookie_name)
			.and_then(|key| self.store.load(&key).map(|data| Session::loaded(key, data)))
			.unwrap_or_default()
	}

	fn build_cookie_header(&self, value: &str, max_age: u64) -> String {
		let mut parts = vec![
			format!("{}={}", self.config.cookie_name, value),
			format!("Path={}", self.config.path),
		];
		if self.config.http_only {
			parts.push("HttpOnly".to_string());
		}
		if self.config.secure {
			parts.push("Secure".to_string());
		}
		if let Some(same_site) = &self.config.same_site {
			parts.push(format!("SameSite={same_site}"));
		}
		parts.push(format!("Max-Age={max_age}"));
		parts.join("; ")
	}

	/// Persist `session` and return the `Set-Cookie` value, if one is due
	fn commit(&self, session: &Session, had_cookie: bool) -> Option<String> {
		let mut state = session.state.lock();
		for old in state.retired_keys.drain(..) {
			self.store.delete(&old);
		}
		if !state.modified {
			return None;
		}

		if state.data.is_empty() {
			if let Some(key) = state.key.take() {
				self.store.delete(&key);
			}
			// Expire the browser's cookie as well
			return had_cookie.then(|| self.build_cookie_header("", 0));
		}

		let key = state
			.key
			.clone()
			.unwrap_or_else(|| self.store.create_key());
		state.key = Some(key.clone());
		self.store.save(&key, state.data.clone(), self.config.ttl);
		state.modified = false;
		Some(self.build_cookie_header(&key, self.config.ttl.as_secs()))
	}
}

impl Default for SessionMiddleware {
	fn default() -> Self {
		Self::new(SessionConfig::default())
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let had_cookie = request.cookie(&self.config.cookie_name).is_some();
		let session = self.load_session(&request);
		request.extensions.insert(session.clone());

		let mut response = next.handle(request).await?;

		if let Some(cookie) = self.commit(&session, had_cookie) {
			response.append_header(SET_COOKIE, &cookie);
		}
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::Method;
	use rstest::rstest;

	struct CountingHandler;

	#[async_trait]
	impl Handler for CountingHandler {
		async fn handle(&self, request: Request) -> Result<Response> {
			let session = Session::from_request(&request).unwrap_or_default();
			let visits = session.get("visits").and_then(|v| v.as_i64()).unwrap_or(0);
			if request.method == Method::DELETE {
				session.flush();
			} else {
				session.set("visits", visits + 1);
			}
			Ok(Response::ok().with_body(visits.to_string()))
		}
	}

	fn request(method: Method, cookie: Option<&str>) -> Request {
		let mut builder = Request::builder().method(method).uri("/");
		if let Some(cookie) = cookie {
			builder = builder.header("cookie", cookie);
		}
		builder.build().unwrap()
	}

	fn session_cookie(response: &Response) -> String {
		let header = response.header("set-cookie").unwrap();
		header.split(';').next().unwrap().to_string()
	}

	#[rstest]
	#[tokio::test]
	async fn test_session_round_trip_through_cookie() {
		// Arrange
		let middleware = SessionMiddleware::default();
		let handler: Arc<dyn Handler> = Arc::new(CountingHandler);

		// Act
		let first = middleware
			.process(request(Method::GET, None), handler.clone())
			.await
			.unwrap();
		let cookie = session_cookie(&first);
		let second = middleware
			.process(request(Method::GET, Some(&cookie)), handler)
			.await
			.unwrap();

		// Assert
		assert_eq!(first.text(), "0");
		assert_eq!(second.text(), "1");
		assert_eq!(middleware.store().len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_cookie_attributes() {
		let middleware = SessionMiddleware::default();

		let response = middleware
			.process(request(Method::GET, None), Arc::new(CountingHandler))
			.await
			.unwrap();

		let header = response.header("set-cookie").unwrap();
		assert!(header.starts_with("sessionid="));
		assert!(header.contains("; Path=/"));
		assert!(header.contains("; HttpOnly"));
		assert!(header.contains("; SameSite=Lax"));
		assert!(header.ends_with("; Max-Age=1209600"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_flush_deletes_and_expires_cookie() {
		// Arrange
		let middleware = SessionMiddleware::default();
		let handler: Arc<dyn Handler> = Arc::new(CountingHandler);
		let first = middleware
			.process(request(Method::GET, None), handler.clone())
			.await
			.unwrap();
		let cookie = session_cookie(&first);

		// Act
		let flushed = middleware
			.process(request(Method::DELETE, Some(&cookie)), handler)
			.await
			.unwrap();

		// Assert
		assert!(middleware.store().is_empty());
		assert!(flushed.header("set-cookie").unwrap().contains("Max-Age=0"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_cookie_starts_fresh_session() {
		let middleware = SessionMiddleware::default();

		let response = middleware
			.process(
				request(Method::GET, Some("sessionid=forged")),
				Arc::new(CountingHandler),
			)
			.await
			.unwrap();

		assert_eq!(response.text(), "0");
		assert_ne!(session_cookie(&response), "sessionid=forged");
	}

	#[rstest]
	fn test_expired_session_is_evicted_on_load() {
		// Arrange
		let store = SessionStore::new();
		store.save("k", HashMap::from([("a".into(), Value::from(1))]), Duration::ZERO);

		// Act
		let loaded = store.load("k");

		// Assert
		assert!(loaded.is_none());
		assert!(store.is_empty());
	}

	#[rstest]
	fn test_save_sweeps_abandoned_sessions() {
		// Arrange
		let store = SessionStore::new();
		store.save("abandoned", HashMap::from([("a".into(), Value::from(1))]), Duration::ZERO);
		assert_eq!(store.len(), 1);

		// Act
		store.save("fresh", HashMap::from([("b".into(), Value::from(2))]), Duration::from_secs(60));

		// Assert
		assert_eq!(store.len(), 1);
		assert!(store.exists("fresh"));
	}

	#[rstest]
	fn test_cycle_key_retires_old_key() {
		// Arrange
		let middleware = SessionMiddleware::default();
		middleware
			.store()
			.save("old", HashMap::from([("a".into(), Value::from(1))]), Duration::from_secs(60));
		let session = Session::loaded("old".into(), middleware.store().load("old").unwrap());

		// Act
		session.cycle_key();
		let cookie = middleware.commit(&session, true).unwrap();

		// Assert
		assert!(!middleware.store().exists("old"));
		let new_key = session.key().unwrap();
		assert_ne!(new_key, "old");
		assert!(cookie.starts_with(&format!("sessionid={new_key}")));
		assert_eq!(
			middleware.store().load(&new_key).unwrap().get("a"),
			Some(&Value::from(1))
		);
	}
}
