//! Management commands run through the `manage` binary.

pub mod base;
pub mod cli;
pub mod commands;
pub mod context;

pub use base::{BaseCommand, CommandError, CommandResult};
pub use cli::{Cli, Commands, run_command};
pub use commands::{CountObjectsCommand, CreateSuperuserCommand, MigrateCommand, RunServerCommand};
pub use context::CommandContext;
