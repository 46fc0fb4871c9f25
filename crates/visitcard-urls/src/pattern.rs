//! Django-style path patterns.

use crate::error::{UrlError, UrlResult};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Converter {
	/// One non-empty segment
	Segment,
	/// Digits only
	Int,
	/// The rest of the path, slashes included
	Path,
}

impl Converter {
	fn regex(self) -> &'static str {
		match self {
			Converter::Segment => "[^/]+",
			Converter::Int => "[0-9]+",
			Converter::Path => ".+",
		}
	}
}

/// A compiled path pattern.
///
/// - `{name}` captures one path segment
/// - `{name:int}` captures a run of digits
/// - `{name:*}` captures the rest of the path, `/` included; callers must
///   validate the value before touching the file system with it
///
/// # Examples
///
/// ```
/// use visitcard_urls::PathPattern;
///
/// let pattern = PathPattern::new("/request/edit/{pk:int}/").unwrap();
/// let params = pattern.matches("/request/edit/42/").unwrap();
/// assert_eq!(params["pk"], "42");
/// assert!(pattern.matches("/request/edit/abc/").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: Regex,
	params: Vec<(String, Converter)>,
}

impl PathPattern {
	pub fn new(pattern: &str) -> UrlResult<Self> {
		let invalid = |reason: &str| UrlError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: reason.to_string(),
		};

		let mut regex_str = String::from("^");
		let mut params: Vec<(String, Converter)> = Vec::new();
		let mut rest = pattern;
		while let Some(start) = rest.find('{') {
			regex_str.push_str(&regex::escape(&rest[..start]));
			let end = rest[start..]
				.find('}')
				.map(|offset| start + offset)
				.ok_or_else(|| invalid("unclosed '{'"))?;
			let spec = &rest[start + 1..end];
			let (name, converter) = match spec.split_once(':') {
				None => (spec, Converter::Segment),
				Some((name, "int")) => (name, Converter::Int),
				Some((name, "*")) => (name, Converter::Path),
				Some((_, other)) => return Err(invalid(&format!("unknown converter '{other}'"))),
			};
			if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
				return Err(invalid("parameter names must be identifiers"));
			}
			if params.iter().any(|(existing, _)| existing == name) {
				return Err(invalid(&format!("duplicate parameter '{name}'")));
			}
			regex_str.push_str(&format!("(?P<{name}>{})", converter.regex()));
			params.push((name.to_string(), converter));
			rest = &rest[end + 1..];
		}
		regex_str.push_str(&regex::escape(rest));
		regex_str.push('$');

		let regex = Regex::new(&regex_str).map_err(|e| invalid(&e.to_string()))?;
		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			params,
		})
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn param_names(&self) -> impl Iterator<Item = &str> {
		self.params.iter().map(|(name, _)| name.as_str())
	}

	/// Captured parameters when `path` matches
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;
		Some(
			self.params
				.iter()
				.filter_map(|(name, _)| {
					captures
						.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect(),
		)
	}

	/// Build a path from `params`; every value must satisfy its converter
	pub fn reverse(&self, name: &str, params: &HashMap<String, String>) -> UrlResult<String> {
		let mut result = self.pattern.clone();
		for (param, converter) in &self.params {
			let value = params.get(param).ok_or_else(|| UrlError::MissingParam {
				name: name.to_string(),
				param: param.clone(),
			})?;
			let valid = match converter {
				Converter::Segment => !value.is_empty() && !value.contains('/'),
				Converter::Int => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
				Converter::Path => !value.is_empty(),
			};
			if !valid {
				return Err(UrlError::InvalidParam {
					param: param.clone(),
					value: value.clone(),
				});
			}
			let placeholder = match converter {
				Converter::Segment => format!("{{{param}}}"),
				Converter::Int => format!("{{{param}:int}}"),
				Converter::Path => format!("{{{param}:*}}"),
			};
			result = result.replace(&placeholder, value);
		}
		Ok(result)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/", true)]
	#[case("/request/", "/request/", true)]
	#[case("/request/", "/request", false)]
	#[case("/request/priority/{rank}/", "/request/priority/low/", true)]
	#[case("/request/priority/{rank}/", "/request/priority/a/b/", false)]
	#[case("/media/{path:*}", "/media/imag/me.jpg", true)]
	#[case("/media/{path:*}", "/media/", false)]
	#[case("/a.b/", "/aXb/", false)]
	fn test_matches(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
		let pattern = PathPattern::new(pattern).unwrap();

		assert_eq!(pattern.matches(path).is_some(), expected);
	}

	#[rstest]
	#[case("/x/{id")]
	#[case("/x/{}/")]
	#[case("/x/{id:float}/")]
	#[case("/x/{id}/{id}/")]
	fn test_invalid_patterns(#[case] pattern: &str) {
		assert!(matches!(
			PathPattern::new(pattern),
			Err(UrlError::InvalidPattern { .. })
		));
	}

	#[rstest]
	fn test_reverse() {
		// Arrange
		let pattern = PathPattern::new("/edit/{pk:int}/").unwrap();
		let good = HashMap::from([("pk".to_string(), "7".to_string())]);
		let bad = HashMap::from([("pk".to_string(), "x".to_string())]);

		// Act / Assert
		assert_eq!(pattern.reverse("edit", &good).unwrap(), "/edit/7/");
		assert!(matches!(
			pattern.reverse("edit", &bad),
			Err(UrlError::InvalidParam { .. })
		));
		assert!(matches!(
			pattern.reverse("edit", &HashMap::new()),
			Err(UrlError::MissingParam { .. })
		));
	}
}
