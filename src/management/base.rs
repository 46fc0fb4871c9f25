use crate::management::context::CommandContext;
use async_trait::async_trait;
use visitcard_auth::AuthError;
use visitcard_conf::SettingsError;
use visitcard_db::DbError;
use visitcard_server::ServerError;
use visitcard_shortcuts::TemplateError;
use visitcard_urls::UrlError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
	#[error("Invalid arguments: {0}")]
	InvalidArguments(String),
	#[error(transparent)]
	Settings(#[from] SettingsError),
	#[error("Database error: {0}")]
	Database(#[from] DbError),
	#[error(transparent)]
	Auth(#[from] AuthError),
	#[error("Server error: {0}")]
	Server(#[from] ServerError),
	#[error("URL configuration error: {0}")]
	Url(#[from] UrlError),
	#[error(transparent)]
	Template(#[from] TemplateError),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// A management command
#[async_trait]
pub trait BaseCommand: Send + Sync {
	fn name(&self) -> &str;

	fn description(&self) -> &str;

	async fn execute(&self, ctx: &CommandContext) -> CommandResult<()>;
}
