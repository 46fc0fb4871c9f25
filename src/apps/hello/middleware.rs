use super::models::AllRequest;
use async_trait::async_trait;
use std::sync::Arc;
use visitcard_db::Database;
use visitcard_http::{Handler, Middleware, Request, Response, Result};

/// Saves every request as an [`AllRequest`] row before it is handled.
///
/// Paths starting with an excluded prefix are not recorded. A failed insert
/// is logged and the request proceeds.
pub struct RequestLoggingMiddleware {
	db: Database,
	exclude: Vec<String>,
}

impl RequestLoggingMiddleware {
	pub fn new(db: Database) -> Self {
		Self {
			db,
			exclude: Vec::new(),
		}
	}

	pub fn with_exclude(mut self, prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.exclude = prefixes.into_iter().map(Into::into).collect();
		self
	}

	fn is_excluded(&self, path: &str) -> bool {
		self.exclude
			.iter()
			.any(|prefix| path.starts_with(prefix.as_str()))
	}
}

#[async_trait]
impl Middleware for RequestLoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let entry = AllRequest::new(request.method.as_str(), request.path());
		if let Err(e) = self.db.objects::<AllRequest>().create(entry).await {
			tracing::error!(error = %e, path = %request.path(), "failed to log request");
		}
		next.handle(request).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		!self.is_excluded(request.path())
	}
}
