//! Core building blocks shared by every visitcard crate.
//!
//! - [`exception`]: the framework-wide error type and its HTTP status mapping
//! - [`signals`]: async model lifecycle signals (`post_save`, `post_delete`, ...)
//! - [`pagination`]: page-number pagination over already-counted result sets

pub mod exception;
pub mod pagination;
pub mod signals;

pub use exception::{Error, Result};
