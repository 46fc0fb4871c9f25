//! Built-in commands

use crate::management::base::{BaseCommand, CommandError, CommandResult};
use crate::management::context::CommandContext;
use crate::{AppState, build_handler, load_templates, setup_database};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use visitcard_auth::User;
use visitcard_db::{Database, DbResult};
use visitcard_server::{HttpServer, LoggingMiddleware, ShutdownCoordinator, shutdown_signal};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect and create any missing tables
async fn open_database(ctx: &CommandContext) -> CommandResult<Database> {
	let db = setup_database(&ctx.settings).await?;
	let created = db.migrate().await?;
	for table in created {
		ctx.verbose(&format!("Created table {table}"));
	}
	Ok(db)
}

/// Create every registered table
pub struct MigrateCommand;

#[async_trait]
impl BaseCommand for MigrateCommand {
	fn name(&self) -> &str {
		"migrate"
	}

	fn description(&self) -> &str {
		"Create the tables of every installed model"
	}

	async fn execute(&self, ctx: &CommandContext) -> CommandResult<()> {
		ctx.info("Running migrations...");
		let db = setup_database(&ctx.settings).await?;
		let created = db.migrate().await?;
		if created.is_empty() {
			ctx.info("No migrations to apply");
		} else {
			for table in &created {
				ctx.info(&format!("Created table {table}"));
			}
			ctx.success(&format!("Applied {} migration(s)", created.len()));
		}
		db.close().await;
		Ok(())
	}
}

/// Serve the site until Ctrl-C
pub struct RunServerCommand {
	pub address: String,
}

impl RunServerCommand {
	pub fn new(address: impl Into<String>) -> Self {
		Self {
			address: address.into(),
		}
	}

	/// `8000` means `127.0.0.1:8000`
	pub fn socket_addr(&self) -> CommandResult<SocketAddr> {
		let address = self.address.trim();
		if let Ok(port) = address.parse::<u16>() {
			return Ok(SocketAddr::from(([127, 0, 0, 1], port)));
		}
		address
			.parse()
			.map_err(|_| CommandError::InvalidArguments(format!("\"{address}\" is not a valid address")))
	}
}

#[async_trait]
impl BaseCommand for RunServerCommand {
	fn name(&self) -> &str {
		"runserver"
	}

	fn description(&self) -> &str {
		"Start the development server"
	}

	async fn execute(&self, ctx: &CommandContext) -> CommandResult<()> {
		let addr = self.socket_addr()?;
		let db = open_database(ctx).await?;
		let templates = load_templates(&ctx.settings)?;
		let state = AppState::new(db.clone(), templates, ctx.settings.clone());
		let handler = build_handler(&state)?;

		let coordinator = ShutdownCoordinator::new(SHUTDOWN_TIMEOUT);
		let trigger = coordinator.clone();
		tokio::spawn(async move {
			shutdown_signal().await;
			trigger.shutdown();
		});

		ctx.info(&format!("Starting development server at http://{addr}/"));
		ctx.info("Quit the server with CONTROL-C.");
		HttpServer::new(handler)
			.with_middleware(Arc::new(LoggingMiddleware::new()))
			.listen_with_shutdown(addr, coordinator)
			.await?;

		db.close().await;
		ctx.success("Server stopped");
		Ok(())
	}
}

/// Report the row count of every installed model on stderr
pub struct CountObjectsCommand;

impl CountObjectsCommand {
	/// One line per registered model, in registration order
	pub async fn report(db: &Database) -> DbResult<Vec<String>> {
		let mut lines = Vec::new();
		for info in db.registry().models() {
			let count = db.count_rows(&info).await?;
			lines.push(format!(
				"Error: Model {} has {count} objects in database",
				info.name
			));
		}
		Ok(lines)
	}
}

#[async_trait]
impl BaseCommand for CountObjectsCommand {
	fn name(&self) -> &str {
		"count_objects"
	}

	fn description(&self) -> &str {
		"Print the number of objects of every model"
	}

	async fn execute(&self, ctx: &CommandContext) -> CommandResult<()> {
		let db = open_database(ctx).await?;
		for line in Self::report(&db).await? {
			eprintln!("{line}");
		}
		db.close().await;
		Ok(())
	}
}

/// Create a staff superuser
pub struct CreateSuperuserCommand {
	pub username: String,
	pub email: String,
	pub password: String,
}

impl CreateSuperuserCommand {
	fn validate(&self) -> CommandResult<()> {
		if self.username.trim().is_empty() {
			return Err(CommandError::InvalidArguments(
				"username must not be empty".to_string(),
			));
		}
		if self.password.is_empty() {
			return Err(CommandError::InvalidArguments(
				"password must not be empty".to_string(),
			));
		}
		Ok(())
	}
}

#[async_trait]
impl BaseCommand for CreateSuperuserCommand {
	fn name(&self) -> &str {
		"createsuperuser"
	}

	fn description(&self) -> &str {
		"Create a user with staff and superuser rights"
	}

	async fn execute(&self, ctx: &CommandContext) -> CommandResult<()> {
		self.validate()?;
		let db = open_database(ctx).await?;
		let user = User::create_superuser(&db, self.username.trim(), &self.email, &self.password).await?;
		ctx.success(&format!("Superuser \"{}\" created successfully.", user.username));
		db.close().await;
		Ok(())
	}
}
