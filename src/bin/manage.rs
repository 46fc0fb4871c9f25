//! `manage`: run a management command

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use visitcard::management::{Cli, CommandContext, run_command};
use visitcard_conf::Settings;

/// `RUST_LOG` wins; otherwise the configured level, raised by each `-v`
fn init_tracing(log_level: &str, verbosity: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = match verbosity {
			0 => log_level,
			1 => "debug",
			_ => "trace",
		};
		EnvFilter::new(level)
	});
	tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let settings = Settings::load(cli.settings.as_deref()).context("failed to load settings")?;
	init_tracing(&settings.log_level, cli.verbosity);

	let ctx = CommandContext::new(settings).with_verbosity(cli.verbosity);
	run_command(cli.command, &ctx).await?;
	Ok(())
}
