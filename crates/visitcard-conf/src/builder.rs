//! Merging configuration sources.

use crate::sources::{ConfigSource, SourceError};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
	#[error("Failed to deserialize settings: {0}")]
	Deserialize(#[from] serde_json::Error),
	#[error("Invalid settings: {0}")]
	Validation(String),
}

/// Collects sources and merges them by priority
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merge every source, lowest priority first.
	///
	/// A string from a higher layer that overrides a non-string value is
	/// converted to that value's type (so `VISITCARD_DEBUG=0` overrides
	/// `debug = true` with `false`).
	pub fn build(mut self) -> Result<MergedSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut values: IndexMap<String, Value> = IndexMap::new();
		for source in &self.sources {
			let layer = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(source = %source.description(), keys = layer.len(), "loaded settings layer");
			for (key, value) in layer {
				let value = match values.get(&key) {
					Some(existing) => coerce_like(existing, value).map_err(|message| {
						SettingsError::InvalidValue {
							key: key.clone(),
							message,
						}
					})?,
					None => value,
				};
				values.insert(key, value);
			}
		}
		Ok(MergedSettings { values })
	}
}

fn coerce_like(existing: &Value, value: Value) -> Result<Value, String> {
	let Value::String(text) = &value else {
		return Ok(value);
	};
	match existing {
		Value::Bool(_) => match text.trim().to_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
			"false" | "0" | "no" | "off" | "" => Ok(Value::Bool(false)),
			other => Err(format!("expected a boolean, got '{other}'")),
		},
		Value::Number(_) => {
			if let Ok(int) = text.trim().parse::<i64>() {
				Ok(Value::from(int))
			} else {
				text.trim()
					.parse::<f64>()
					.map(Value::from)
					.map_err(|_| format!("expected a number, got '{text}'"))
			}
		}
		Value::Array(_) => Ok(Value::Array(
			text.split(',')
				.map(str::trim)
				.filter(|item| !item.is_empty())
				.map(|item| Value::String(item.to_string()))
				.collect(),
		)),
		_ => Ok(value),
	}
}

/// The merged key/value view of all sources
#[derive(Debug, Clone, Default)]
pub struct MergedSettings {
	values: IndexMap<String, Value>,
}

impl MergedSettings {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, SettingsError> {
		let object: serde_json::Map<String, Value> = self.values.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::DefaultSource;
	use rstest::rstest;
	use serde_json::json;

	struct Layer(u8, Vec<(&'static str, Value)>);

	impl ConfigSource for Layer {
		fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
			Ok(self.1.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
		}

		fn priority(&self) -> u8 {
			self.0
		}

		fn description(&self) -> String {
			format!("layer {}", self.0)
		}
	}

	#[rstest]
	fn test_higher_priority_wins_regardless_of_order() {
		// Arrange
		let builder = SettingsBuilder::new()
			.add_source(Layer(100, vec![("name", json!("env"))]))
			.add_source(DefaultSource::new().with_value("name", json!("default")))
			.add_source(Layer(50, vec![("name", json!("file")), ("extra", json!(1))]));

		// Act
		let merged = builder.build().unwrap();

		// Assert
		assert_eq!(merged.get("name"), Some(&json!("env")));
		assert_eq!(merged.get("extra"), Some(&json!(1)));
	}

	#[rstest]
	#[case(json!(true), "0", json!(false))]
	#[case(json!(true), "off", json!(false))]
	#[case(json!(10), "25", json!(25))]
	#[case(json!(["/static/"]), "/a/, /b/", json!(["/a/", "/b/"]))]
	#[case(json!("x"), "42", json!("42"))]
	fn test_strings_are_coerced(#[case] base: Value, #[case] raw: &str, #[case] expected: Value) {
		let merged = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("key", base))
			.add_source(Layer(100, vec![("key", json!(raw))]))
			.build()
			.unwrap();

		assert_eq!(merged.get("key"), Some(&expected));
	}

	#[rstest]
	fn test_bad_coercion_names_key() {
		let result = SettingsBuilder::new()
			.add_source(DefaultSource::new().with_value("requests_per_page", json!(10)))
			.add_source(Layer(100, vec![("requests_per_page", json!("ten"))]))
			.build();

		assert!(matches!(
			result,
			Err(SettingsError::InvalidValue { key, .. }) if key == "requests_per_page"
		));
	}
}
