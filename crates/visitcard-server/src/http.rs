use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use visitcard_http::{Handler, Middleware, MiddlewareChain, Request, Response};

use crate::shutdown::ShutdownCoordinator;

/// Errors that stop the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("failed to bind or accept: {0}")]
	Io(#[from] std::io::Error),
	#[error("connection error: {0}")]
	Hyper(#[from] hyper::Error),
}

/// HTTP/1.1 server with middleware support
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Add a middleware; the first one added runs outermost
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}

		Arc::new(chain)
	}

	/// Bind `addr` and serve until `coordinator` requests shutdown
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		let listener = TcpListener::bind(addr).await?;
		self.serve_listener(listener, coordinator).await
	}

	/// Serve connections from an already bound listener until shutdown.
	///
	/// Binding `127.0.0.1:0` up front and passing the listener here lets
	/// callers learn the chosen port before serving.
	pub async fn serve_listener(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		if let Ok(addr) = listener.local_addr() {
			tracing::info!(%addr, "server listening on http://{}", addr);
		}

		let handler = self.build_handler();
		let mut shutdown_rx = coordinator.subscribe();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result?;
					let handler = handler.clone();
					let mut conn_shutdown = coordinator.subscribe();

					tokio::task::spawn(async move {
						tokio::select! {
							result = Self::handle_connection(stream, socket_addr, handler) => {
								if let Err(err) = result {
									tracing::warn!(peer = %socket_addr, error = %err, "error handling connection");
								}
							}
							_ = conn_shutdown.recv() => {
								tracing::debug!(peer = %socket_addr, "connection closed by shutdown");
							}
						}
					});
				}
				_ = shutdown_rx.recv() => {
					tracing::info!("shutdown signal received, stopping server");
					break;
				}
			}
		}

		coordinator.notify_shutdown_complete();

		Ok(())
	}

	/// Serve HTTP/1.1 requests on a single TCP connection
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), ServerError> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

/// Adapts a [`Handler`] to hyper's `Service`
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = handler.handle(request).await.unwrap_or_else(Response::from);

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::time::Duration;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};
	use visitcard_core::Error;

	struct EchoPath;

	#[async_trait::async_trait]
	impl Handler for EchoPath {
		async fn handle(&self, request: Request) -> visitcard_core::Result<Response> {
			if request.path() == "/missing/" {
				return Err(Error::NotFound("missing".into()));
			}
			Ok(Response::ok().with_body(format!(
				"{} {} {}",
				request.method,
				request.path(),
				request.remote_addr.is_some()
			)))
		}
	}

	async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
		let mut stream = TcpStream::connect(addr).await.unwrap();
		stream.write_all(raw.as_bytes()).await.unwrap();
		let mut buf = Vec::new();
		stream.read_to_end(&mut buf).await.unwrap();
		String::from_utf8_lossy(&buf).into_owned()
	}

	#[rstest]
	#[tokio::test]
	async fn test_serves_until_shutdown() {
		// Arrange
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(2));
		let server = HttpServer::new(Arc::new(EchoPath));
		let task = tokio::spawn(server.serve_listener(listener, coordinator.clone()));

		// Act
		let ok = roundtrip(
			addr,
			"GET /hello/ HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
		)
		.await;
		let missing = roundtrip(
			addr,
			"GET /missing/ HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
		)
		.await;
		coordinator.shutdown();

		// Assert
		assert!(ok.starts_with("HTTP/1.1 200 OK"));
		assert!(ok.ends_with("GET /hello/ true"));
		assert!(missing.starts_with("HTTP/1.1 404 Not Found"));
		assert!(coordinator.wait_for_shutdown().await);
		assert!(task.await.unwrap().is_ok());
	}
}
