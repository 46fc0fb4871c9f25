//! CLI parser for the `manage` binary

use crate::management::base::{BaseCommand, CommandResult};
use crate::management::commands::{
	CountObjectsCommand, CreateSuperuserCommand, MigrateCommand, RunServerCommand,
};
use crate::management::context::CommandContext;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "manage")]
#[command(about = "visitcard management interface", long_about = None)]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Verbosity level (can be repeated for more output)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	pub verbosity: u8,

	/// TOML settings file (default: $VISITCARD_SETTINGS_FILE or settings/base.toml)
	#[arg(long, value_name = "PATH", global = true)]
	pub settings: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
	/// Start the development server
	Runserver {
		/// Server address (default: 127.0.0.1:8000)
		#[arg(value_name = "ADDRESS", default_value = "127.0.0.1:8000")]
		address: String,
	},

	/// Create the database tables
	Migrate,

	/// Print the number of objects of every model to stderr
	#[command(name = "count_objects")]
	CountObjects,

	/// Create a superuser
	Createsuperuser {
		#[arg(long)]
		username: String,

		#[arg(long, default_value = "")]
		email: String,

		#[arg(long)]
		password: String,
	},
}

impl Commands {
	pub fn into_command(self) -> Box<dyn BaseCommand> {
		match self {
			Commands::Runserver { address } => Box::new(RunServerCommand::new(address)),
			Commands::Migrate => Box::new(MigrateCommand),
			Commands::CountObjects => Box::new(CountObjectsCommand),
			Commands::Createsuperuser {
				username,
				email,
				password,
			} => Box::new(CreateSuperuserCommand {
				username,
				email,
				password,
			}),
		}
	}
}

/// Execute `command` with the loaded settings
pub async fn run_command(command: Commands, ctx: &CommandContext) -> CommandResult<()> {
	let command = command.into_command();
	tracing::debug!(command = command.name(), "running management command");
	command.execute(ctx).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_runserver_default_address() {
		let cli = Cli::try_parse_from(["manage", "runserver"]).unwrap();

		assert!(matches!(
			cli.command,
			Commands::Runserver { address } if address == "127.0.0.1:8000"
		));
	}

	#[rstest]
	fn test_count_objects_keeps_underscore() {
		// Act
		let cli = Cli::try_parse_from(["manage", "-vv", "count_objects"]).unwrap();

		// Assert
		assert!(matches!(cli.command, Commands::CountObjects));
		assert_eq!(cli.verbosity, 2);
		assert_eq!(cli.command.into_command().name(), "count_objects");
	}

	#[rstest]
	fn test_global_options_after_subcommand() {
		let cli =
			Cli::try_parse_from(["manage", "migrate", "--settings", "settings/test.toml", "-v"])
				.unwrap();

		assert_eq!(cli.settings, Some(PathBuf::from("settings/test.toml")));
		assert_eq!(cli.verbosity, 1);
	}

	#[rstest]
	fn test_createsuperuser_requires_username() {
		let result = Cli::try_parse_from(["manage", "createsuperuser", "--password", "x"]);

		assert!(result.is_err());
	}
}
