//! Tera template loading.

use crate::error::TemplateError;
use std::error::Error as _;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, Tera};

/// Shared, immutable tera instance
///
/// # Examples
///
/// ```
/// use visitcard_shortcuts::TemplateRenderer;
/// use tera::Context;
///
/// let renderer = TemplateRenderer::from_templates(&[
///     ("greeting.html", "Hello {{ name }}!"),
/// ]).unwrap();
///
/// let mut context = Context::new();
/// context.insert("name", "<Ann>");
/// assert_eq!(renderer.render("greeting.html", &context).unwrap(), "Hello &lt;Ann&gt;!");
/// ```
#[derive(Clone)]
pub struct TemplateRenderer {
	tera: Arc<Tera>,
}

impl TemplateRenderer {
	/// Load every `*.html` template under `dir`
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
		let glob = format!("{}/**/*.html", dir.as_ref().display());
		let tera = Tera::new(&glob).map_err(|e| TemplateError::Load(error_chain(&e)))?;
		tracing::debug!(
			dir = %dir.as_ref().display(),
			templates = tera.get_template_names().count(),
			"loaded templates"
		);
		Ok(Self::from_tera(tera))
	}

	/// Build from in-memory `(name, source)` pairs
	pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self, TemplateError> {
		let mut tera = Tera::default();
		tera.add_raw_templates(templates.iter().copied())
			.map_err(|e| TemplateError::Load(error_chain(&e)))?;
		Ok(Self::from_tera(tera))
	}

	pub fn from_tera(tera: Tera) -> Self {
		Self {
			tera: Arc::new(tera),
		}
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|template| template == name)
	}

	pub fn render(&self, name: &str, context: &Context) -> Result<String, TemplateError> {
		self.tera.render(name, context).map_err(|e| match e.kind {
			tera::ErrorKind::TemplateNotFound(_) => TemplateError::NotFound(name.to_string()),
			_ => TemplateError::Render(error_chain(&e)),
		})
	}
}

impl std::fmt::Debug for TemplateRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TemplateRenderer")
			.field("templates", &self.tera.get_template_names().count())
			.finish()
	}
}

// tera's Display only shows the outermost message
fn error_chain(err: &tera::Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
