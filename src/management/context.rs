//! Command execution context

use console::style;
use visitcard_conf::Settings;

#[derive(Debug, Clone)]
pub struct CommandContext {
	pub settings: Settings,
	pub verbosity: u8,
}

impl CommandContext {
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			verbosity: 0,
		}
	}

	pub fn with_verbosity(mut self, verbosity: u8) -> Self {
		self.verbosity = verbosity;
		self
	}

	pub fn info(&self, message: &str) {
		println!("{} {message}", style("[INFO]").cyan());
	}

	pub fn success(&self, message: &str) {
		println!("{} {message}", style("[SUCCESS]").green());
	}

	pub fn warning(&self, message: &str) {
		eprintln!("{} {message}", style("[WARNING]").yellow());
	}

	/// Printed only with `-v`
	pub fn verbose(&self, message: &str) {
		if self.verbosity > 0 {
			println!("{} {message}", style("[VERBOSE]").dim());
		}
	}
}
