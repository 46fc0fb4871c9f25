//! HTTP request and response types for visitcard.
//!
//! This crate provides the request pipeline abstractions shared by every
//! other crate:
//!
//! - [`Request`] / [`Response`]: buffered HTTP messages
//! - [`Handler`] / [`Middleware`] / [`MiddlewareChain`]: request processing
//! - [`Extensions`]: typed per-request storage used by middleware
//! - [`FormData`] / [`UploadedFile`]: decoded urlencoded and multipart bodies

pub mod auth_state;
pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;
pub mod upload;

pub use auth_state::AuthState;
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{FormData, Request, RequestBuilder};
pub use response::Response;
pub use upload::UploadedFile;

pub use visitcard_core::exception::{Error, Result};
