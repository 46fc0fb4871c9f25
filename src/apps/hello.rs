//! The profile app: models, audit signals, forms, views and the request
//! logger.

pub mod forms;
pub mod images;
pub mod middleware;
pub mod models;
pub mod signals;
pub mod urls;
pub mod views;

pub use middleware::RequestLoggingMiddleware;
pub use models::{About, AllRequest, SignalData};

pub const APP_LABEL: &str = "hello";
