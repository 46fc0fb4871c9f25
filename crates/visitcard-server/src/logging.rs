use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use visitcard_core::Result;
use visitcard_http::{Handler, Middleware, Request, Response};

/// Logs one line per request: method, path, status and elapsed time
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Utc::now();
		let method = request.method.clone();
		let path = request.path().to_string();

		let result = next.handle(request).await;

		let elapsed_ms = Utc::now().signed_duration_since(start).num_milliseconds();
		match &result {
			Ok(response) => {
				tracing::info!(
					%method,
					%path,
					status = response.status.as_u16(),
					elapsed_ms,
					"request finished"
				);
			}
			Err(err) => {
				tracing::error!(%method, %path, error = %err, elapsed_ms, "request failed");
			}
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Teapot;

	#[async_trait]
	impl Handler for Teapot {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::new(hyper::StatusCode::IM_A_TEAPOT))
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_passes_response_through() {
		// Arrange
		let request = Request::builder().uri("/tea/").build().unwrap();

		// Act
		let response = LoggingMiddleware::new()
			.process(request, Arc::new(Teapot))
			.await
			.unwrap();

		// Assert
		assert_eq!(response.status.as_u16(), 418);
	}
}
