//! View shortcuts for visitcard: tera rendering, redirects, JSON,
//! `get_object_or_404` and file serving.

pub mod error;
pub mod get_or_404;
pub mod render;
pub mod static_files;
pub mod template;

pub use error::{GetError, TemplateError};
pub use get_or_404::{get_object_or_404, parse_pk};
pub use render::{redirect, render, render_json, render_text, render_with_status};
pub use static_files::{content_type_for, serve_file};
pub use template::TemplateRenderer;

pub use tera;
