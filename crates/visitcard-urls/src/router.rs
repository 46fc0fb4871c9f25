use crate::error::{UrlError, UrlResult};
use crate::route::Route;
use async_trait::async_trait;
use hyper::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use visitcard_core::exception::Error;
use visitcard_http::{Handler, Request, Response, Result};

/// Ordered list of routes; the first matching pattern wins.
///
/// A `Router` is itself a [`Handler`]. Unmatched paths without a trailing
/// slash are redirected to the slashed path when that one would match;
/// everything else unmatched is a 404.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use visitcard_urls::Router;
/// # use async_trait::async_trait;
/// # use visitcard_http::{Handler, Request, Response, Result};
/// # struct Dummy;
/// # #[async_trait]
/// # impl Handler for Dummy {
/// #     async fn handle(&self, _req: Request) -> Result<Response> {
/// #         Ok(Response::ok())
/// #     }
/// # }
///
/// let router = Router::new()
///     .route("/request/edit/{pk:int}/", Arc::new(Dummy), "request_edit")
///     .unwrap();
///
/// assert_eq!(
///     router.reverse("request_edit", &[("pk", "3")]).unwrap(),
///     "/request/edit/3/"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self { routes: Vec::new() }
	}

	pub fn add_route(&mut self, route: Route) {
		self.routes.push(route);
	}

	/// Add a named route
	pub fn route(mut self, path: &str, handler: Arc<dyn Handler>, name: &str) -> UrlResult<Self> {
		self.add_route(Route::new(path, handler)?.with_name(name));
		Ok(self)
	}

	/// Add an unnamed route
	pub fn path(mut self, path: &str, handler: Arc<dyn Handler>) -> UrlResult<Self> {
		self.add_route(Route::new(path, handler)?);
		Ok(self)
	}

	/// Mount every route of `other` under `prefix`, names prefixed with
	/// `namespace:`
	pub fn include(mut self, prefix: &str, namespace: Option<&str>, other: Router) -> UrlResult<Self> {
		let prefix = prefix.trim_end_matches('/');
		for route in other.routes {
			let mut mounted = Route::new(&format!("{prefix}{}", route.path()), route.handler().clone())?;
			mounted.name = match (namespace, route.name) {
				(Some(namespace), Some(name)) => Some(format!("{namespace}:{name}")),
				(None, name) => name,
				(Some(_), None) => None,
			};
			self.add_route(mounted);
		}
		Ok(self)
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	/// The matching route and its captured parameters
	pub fn resolve(&self, path: &str) -> Option<(&Route, HashMap<String, String>)> {
		self.routes
			.iter()
			.find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
	}

	/// Path for the route called `name`
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> UrlResult<String> {
		let route = self
			.routes
			.iter()
			.find(|route| route.name.as_deref() == Some(name))
			.ok_or_else(|| UrlError::NoReverseMatch(name.to_string()))?;
		let params: HashMap<String, String> = params
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect();
		route.pattern.reverse(name, &params)
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		if let Some((route, params)) = self.resolve(&path) {
			for (key, value) in params {
				request.set_path_param(key, value);
			}
			let handler = route.handler().clone();
			return handler.handle(request).await;
		}

		if !path.ends_with('/') {
			let slashed = format!("{path}/");
			if self.resolve(&slashed).is_some() {
				let location = match request.uri.query() {
					Some(query) => format!("{slashed}?{query}"),
					None => slashed,
				};
				return Ok(Response::new(StatusCode::MOVED_PERMANENTLY).with_location(&location));
			}
		}

		tracing::debug!(path = %path, "no route matched");
		Err(Error::NotFound(format!("No route matches {path}")))
	}
}
