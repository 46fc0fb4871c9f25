//! URL dispatch for visitcard.
//!
//! Patterns use `{name}` placeholders (see [`PathPattern`]); a [`Router`]
//! tries its routes in order, stores the captured values as request path
//! parameters and calls the matching handler.

pub mod error;
pub mod pattern;
pub mod route;
pub mod router;

pub use error::{UrlError, UrlResult};
pub use pattern::PathPattern;
pub use route::Route;
pub use router::Router;
