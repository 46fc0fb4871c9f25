//! HTTP server for visitcard.
//!
//! A hyper HTTP/1.1 server that runs one task per connection and drives a
//! [`visitcard_http::Handler`] through its middleware chain.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use visitcard_server::{HttpServer, LoggingMiddleware, ShutdownCoordinator, shutdown_signal};
//! # use visitcard_http::{Handler, Request, Response};
//! # struct App;
//! # #[async_trait::async_trait]
//! # impl Handler for App {
//! #     async fn handle(&self, _req: Request) -> visitcard_core::Result<Response> {
//! #         Ok(Response::ok())
//! #     }
//! # }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = ShutdownCoordinator::new(Duration::from_secs(30));
//! let server = HttpServer::new(Arc::new(App)).with_middleware(Arc::new(LoggingMiddleware));
//!
//! let trigger = coordinator.clone();
//! tokio::spawn(async move {
//!     shutdown_signal().await;
//!     trigger.shutdown();
//! });
//! server.listen_with_shutdown("127.0.0.1:8000".parse()?, coordinator).await?;
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod logging;
pub mod shutdown;

pub use http::{HttpServer, ServerError};
pub use logging::LoggingMiddleware;
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
