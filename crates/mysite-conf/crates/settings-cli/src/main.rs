//! mysite settings CLI
//!
//! Resolves the production settings the same way the site process does and
//! lets an operator inspect or check them before a deploy.
//!
//! ## Usage
//!
//! ```bash
//! mysite-settings --env-file .env show --format json
//! mysite-settings show --key storages.default
//! mysite-settings check --fail-on-warning
//! ```

mod commands;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use commands::ResolveOptions;
use commands::check::CheckArgs;
use commands::show::ShowArgs;
use mysite_conf::settings::logging::FRAMEWORK_LOGGER;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Crates whose events follow the framework logger level
const OWN_TARGETS: &[&str] = &["mysite_conf", "mysite_settings"];

#[derive(Parser)]
#[command(name = "mysite-settings")]
#[command(about = "Inspect and check mysite production settings", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Project base directory holding `settings/local.toml`
	#[arg(long, global = true, value_name = "DIR", default_value = ".")]
	base_dir: PathBuf,

	/// Load environment variables from this file before resolving
	#[arg(long, global = true, value_name = "PATH")]
	env_file: Option<PathBuf>,

	/// Ignore `settings/local.toml`
	#[arg(long, global = true)]
	no_local: bool,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Show the resolved settings, with secrets redacted
	Show(ShowArgs),

	/// Run the deployment checks against the resolved settings
	Check(CheckArgs),
}

impl Cli {
	fn resolve_options(&self) -> ResolveOptions {
		ResolveOptions {
			base_dir: self.base_dir.clone(),
			env_file: self.env_file.clone(),
			no_local: self.no_local,
		}
	}
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	let options = cli.resolve_options();
	let filter = init_tracing(cli.verbosity);

	if let Err(e) = run(cli.command, &options, &filter).await {
		output::error(&format!("Error: {:#}", e));
		process::exit(1);
	}
}

async fn run(
	command: Commands,
	options: &ResolveOptions,
	filter: &TracingFilter,
) -> anyhow::Result<()> {
	let settings = options.resolve()?;
	filter.apply(&settings.logging);

	match command {
		Commands::Show(args) => commands::show::execute(args, &settings).await,
		Commands::Check(args) => commands::check::execute(args, &settings).await,
	}
}

/// Filter handle that follows the resolved logging configuration
struct TracingFilter {
	handle: reload::Handle<EnvFilter, Registry>,
	verbosity: u8,
}

impl TracingFilter {
	/// Switch to the levels of the resolved `LOGGING` unless `-v` was given
	fn apply(&self, logging: &mysite_conf::settings::LoggingConfig) {
		if self.verbosity > 0 {
			return;
		}
		let directives = logging_directives(logging);
		if let Err(e) = self.handle.reload(EnvFilter::new(&directives)) {
			tracing::warn!(error = %e, "cannot apply logging configuration");
		}
	}
}

fn init_tracing(verbosity: u8) -> TracingFilter {
	let (filter, handle) = reload::Layer::new(EnvFilter::new(verbosity_directives(verbosity)));
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr))
		.init();
	TracingFilter { handle, verbosity }
}

fn verbosity_directives(verbosity: u8) -> String {
	let level = match verbosity {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	OWN_TARGETS
		.iter()
		.map(|target| format!("{}={}", target, level))
		.collect::<Vec<_>>()
		.join(",")
}

fn logging_directives(logging: &mysite_conf::settings::LoggingConfig) -> String {
	let mut directives = vec![logging.env_filter_directives()];
	if let Some(level) = logging.level_of(FRAMEWORK_LOGGER) {
		directives.extend(
			OWN_TARGETS
				.iter()
				.map(|target| format!("{}={}", target, level.directive())),
		);
	}
	directives.retain(|d| !d.is_empty());
	directives.join(",")
}

#[cfg(test)]
mod tests {
	use super::*;
	use mysite_conf::settings::logging::{LogLevel, LoggingConfig};
	use rstest::rstest;

	#[rstest]
	fn cli_parses_global_flags_after_subcommand() {
		// Act
		let cli = Cli::try_parse_from([
			"mysite-settings",
			"show",
			"--key",
			"debug",
			"--no-local",
			"--base-dir",
			"/srv/mysite",
			"-vv",
		])
		.unwrap();

		// Assert
		assert!(cli.no_local);
		assert_eq!(cli.base_dir, PathBuf::from("/srv/mysite"));
		assert_eq!(cli.verbosity, 2);
		assert!(matches!(cli.command, Commands::Show(ShowArgs { key: Some(ref k), .. }) if k == "debug"));
	}

	#[rstest]
	fn cli_parses_check() {
		// Act
		let cli = Cli::try_parse_from(["mysite-settings", "check", "--fail-on-warning"]).unwrap();

		// Assert
		assert_eq!(cli.base_dir, PathBuf::from("."));
		assert!(cli.env_file.is_none());
		assert!(matches!(
			cli.command,
			Commands::Check(CheckArgs {
				fail_on_warning: true
			})
		));
	}

	#[rstest]
	#[case(0, "mysite_conf=warn,mysite_settings=warn")]
	#[case(1, "mysite_conf=debug,mysite_settings=debug")]
	#[case(3, "mysite_conf=trace,mysite_settings=trace")]
	fn verbosity_maps_to_directives(#[case] verbosity: u8, #[case] expected: &str) {
		assert_eq!(verbosity_directives(verbosity), expected);
	}

	#[rstest]
	fn logging_directives_follow_framework_logger() {
		// Arrange
		let logging = LoggingConfig::console(LogLevel::Error);

		// Act
		let directives = logging_directives(&logging);

		// Assert
		assert_eq!(
			directives,
			"django=error,mysite_conf=error,mysite_settings=error"
		);
	}
}
