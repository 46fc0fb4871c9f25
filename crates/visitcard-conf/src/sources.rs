//! Configuration sources.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// A layer of configuration values
pub trait ConfigSource: Send + Sync {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Higher priorities override lower ones
	fn priority(&self) -> u8;

	fn description(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Parse error: {0}")]
	Parse(String),
}

/// Built-in values, lowest priority
#[derive(Debug, Default, Clone)]
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}

	/// Every field of a serializable struct as a default
	pub fn from_serialize<T: serde::Serialize>(defaults: &T) -> Result<Self, SourceError> {
		match serde_json::to_value(defaults)? {
			Value::Object(map) => Ok(Self {
				values: map.into_iter().collect(),
			}),
			_ => Err(SourceError::Parse("defaults must serialize to an object".into())),
		}
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// A TOML file; a missing file contributes nothing
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			tracing::debug!(path = %self.path.display(), "settings file not found, skipping");
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		match serde_json::to_value(toml_value)? {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(SourceError::Parse("Expected table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variables starting with a prefix, e.g. `VISITCARD_DEBUG`
/// becomes `debug`.
///
/// Values are loaded as strings; the builder converts them to the type of
/// the value they override.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(std::env::vars()
			.filter_map(|(key, value)| {
				key.strip_prefix(&self.prefix)
					.filter(|rest| !rest.is_empty())
					.map(|rest| (rest.to_lowercase(), Value::String(value)))
			})
			.collect())
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_toml_source() {
		// Arrange
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("base.toml");
		fs::write(&path, "debug = false\nrequests_per_page = 5\n").unwrap();

		// Act
		let values = TomlFileSource::new(&path).load().unwrap();

		// Assert
		assert_eq!(values["debug"], Value::Bool(false));
		assert_eq!(values["requests_per_page"], Value::from(5));
	}

	#[rstest]
	fn test_missing_toml_file_is_empty() {
		let values = TomlFileSource::new("/nonexistent/base.toml").load().unwrap();

		assert!(values.is_empty());
	}

	#[rstest]
	fn test_malformed_toml_is_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.toml");
		fs::write(&path, "debug = = true").unwrap();

		assert!(matches!(
			TomlFileSource::new(&path).load(),
			Err(SourceError::Toml(_))
		));
	}

	#[rstest]
	#[serial(env)]
	fn test_env_source_strips_prefix() {
		// Arrange
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			std::env::set_var("VCTEST_MEDIA_ROOT", "/srv/media");
			std::env::set_var("VCTEST_", "ignored");
		}

		// Act
		let values = EnvSource::new("VCTEST_").load().unwrap();

		// Assert
		assert_eq!(values.len(), 1);
		assert_eq!(values["media_root"], Value::from("/srv/media"));
		unsafe {
			std::env::remove_var("VCTEST_MEDIA_ROOT");
			std::env::remove_var("VCTEST_");
		}
	}
}
