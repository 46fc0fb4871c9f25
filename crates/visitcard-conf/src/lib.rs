//! Layered settings: built-in defaults, a TOML file, then environment
//! variables.

pub mod builder;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder, SettingsError};
pub use settings::{
	DEFAULT_SETTINGS_FILE, ENV_PREFIX, SETTINGS_FILE_ENV, Settings,
};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
