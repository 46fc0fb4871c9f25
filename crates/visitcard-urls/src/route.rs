use crate::error::UrlResult;
use crate::pattern::PathPattern;
use std::sync::Arc;
use visitcard_http::Handler;

/// A path pattern bound to a handler, optionally named for reversing
#[derive(Clone)]
pub struct Route {
	pub pattern: PathPattern,
	pub name: Option<String>,
	handler: Arc<dyn Handler>,
}

impl Route {
	pub fn new(path: &str, handler: Arc<dyn Handler>) -> UrlResult<Self> {
		Ok(Self {
			pattern: PathPattern::new(path)?,
			name: None,
			handler,
		})
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn handler(&self) -> &Arc<dyn Handler> {
		&self.handler
	}

	pub fn path(&self) -> &str {
		self.pattern.pattern()
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path())
			.field("name", &self.name)
			.finish()
	}
}
