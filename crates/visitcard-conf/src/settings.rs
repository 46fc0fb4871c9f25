//! Project settings.

use crate::builder::{SettingsBuilder, SettingsError};
use crate::sources::{DefaultSource, EnvSource, TomlFileSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "VISITCARD_";

/// Environment variable naming the TOML settings file
pub const SETTINGS_FILE_ENV: &str = "VISITCARD_SETTINGS_FILE";

/// Settings file used when neither `--settings` nor the environment names one
pub const DEFAULT_SETTINGS_FILE: &str = "settings/base.toml";

/// Main settings structure for a visitcard project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Debug mode (don't run with debug=true in production!)
	pub debug: bool,

	pub secret_key: String,

	/// sqlx connection URL, e.g. `sqlite://visitcard.sqlite3?mode=rwc`
	pub database_url: String,

	pub database_max_connections: u32,

	/// Directory searched for `**/*.html` templates
	pub templates_dir: PathBuf,

	pub static_url: String,
	pub static_root: PathBuf,

	pub media_url: String,

	/// Uploaded profile images land in `{media_root}/imag/`
	pub media_root: PathBuf,

	pub login_url: String,

	pub session_cookie_name: String,

	/// Session lifetime in seconds
	pub session_cookie_age: u64,

	pub session_cookie_secure: bool,

	/// Default tracing filter when `RUST_LOG` is unset
	pub log_level: String,

	/// Path prefixes the request logger does not record
	pub request_log_exclude: Vec<String>,

	pub requests_per_page: usize,

	/// Number of rows in the AJAX request feed
	pub feed_size: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debug: true,
			secret_key: "insecure-change-me".to_string(),
			database_url: "sqlite://visitcard.sqlite3?mode=rwc".to_string(),
			database_max_connections: 5,
			templates_dir: PathBuf::from("templates"),
			static_url: "/static/".to_string(),
			static_root: PathBuf::from("static"),
			media_url: "/media/".to_string(),
			media_root: PathBuf::from("media"),
			login_url: "/login/".to_string(),
			session_cookie_name: "sessionid".to_string(),
			session_cookie_age: 60 * 60 * 24 * 7 * 2,
			session_cookie_secure: false,
			log_level: "info".to_string(),
			request_log_exclude: vec![
				"/static/".to_string(),
				"/media/".to_string(),
				"/favicon.ico".to_string(),
			],
			requests_per_page: 10,
			feed_size: 10,
		}
	}
}

impl Settings {
	/// Load settings from defaults, a TOML file and `VISITCARD_*` variables.
	///
	/// The file is `path` when given, else `$VISITCARD_SETTINGS_FILE`, else
	/// `settings/base.toml`. A missing file is skipped.
	///
	/// # Examples
	///
	/// ```no_run
	/// use visitcard_conf::Settings;
	///
	/// let settings = Settings::load(None).unwrap();
	/// assert_eq!(settings.requests_per_page, 10);
	/// ```
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let file = match path {
			Some(path) => path.to_path_buf(),
			None => std::env::var_os(SETTINGS_FILE_ENV)
				.map(PathBuf::from)
				.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE)),
		};

		let defaults = DefaultSource::from_serialize(&Settings::default()).map_err(|error| {
			SettingsError::Source {
				source_name: "Default values".to_string(),
				error,
			}
		})?;

		let settings: Settings = SettingsBuilder::new()
			.add_source(defaults)
			.add_source(TomlFileSource::new(file))
			.add_source(EnvSource::new(ENV_PREFIX))
			.build()?
			.into_typed()?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.requests_per_page == 0 {
			return Err(SettingsError::Validation(
				"requests_per_page must be at least 1".into(),
			));
		}
		if self.database_max_connections == 0 {
			return Err(SettingsError::Validation(
				"database_max_connections must be at least 1".into(),
			));
		}
		if !self.login_url.starts_with('/') {
			return Err(SettingsError::Validation(format!(
				"login_url must be an absolute path, got '{}'",
				self.login_url
			)));
		}
		if !self.debug && self.secret_key == Settings::default().secret_key {
			tracing::warn!("running with debug=false and the default secret_key");
		}
		Ok(())
	}

	pub fn session_ttl(&self) -> Duration {
		Duration::from_secs(self.session_cookie_age)
	}

	/// Whether the request logger should skip `path`
	pub fn is_log_excluded(&self, path: &str) -> bool {
		self.request_log_exclude
			.iter()
			.any(|prefix| path.starts_with(prefix.as_str()))
	}
}
