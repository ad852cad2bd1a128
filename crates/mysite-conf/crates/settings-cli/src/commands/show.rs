//! Show command

use crate::output::{self, OutputFormat};
use clap::Args;
use mysite_conf::Settings;
use serde_json::Value;

#[derive(Args)]
pub(crate) struct ShowArgs {
	/// Key to show, e.g. `storages.default` (shows all if not specified)
	#[arg(short, long)]
	pub key: Option<String>,

	/// Output format (text, json, toml)
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	pub format: OutputFormatArg,

	/// Show sensitive values without redaction (secret key, passwords, access keys)
	#[arg(long)]
	pub show_secrets: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub(crate) enum OutputFormatArg {
	Text,
	Json,
	Toml,
}

impl From<OutputFormatArg> for OutputFormat {
	fn from(arg: OutputFormatArg) -> Self {
		match arg {
			OutputFormatArg::Text => OutputFormat::Text,
			OutputFormatArg::Json => OutputFormat::Json,
			OutputFormatArg::Toml => OutputFormat::Toml,
		}
	}
}

/// Print the resolved settings
pub(crate) async fn execute(args: ShowArgs, settings: &Settings) -> anyhow::Result<()> {
	match &args.key {
		Some(key) => {
			let value = settings
				.get(key)
				.ok_or_else(|| anyhow::anyhow!("Key not found: {}", key))?;

			output::info(&format!("Value for key '{}':", key));
			output::print_value(&displayed(key, value, args.show_secrets), args.format.into())?;
		}
		None => {
			let value = settings.to_value()?;
			let value = if args.show_secrets {
				value
			} else {
				output::redact_sensitive_values(&value)
			};

			output::info("Resolved settings:");
			output::print_value(&value, args.format.into())?;
		}
	}

	Ok(())
}

/// Redact a looked-up value unless secrets were requested
fn displayed(key: &str, value: Value, show_secrets: bool) -> Value {
	if show_secrets {
		value
	} else if output::is_sensitive_key(key) && !value.is_null() {
		Value::String(output::REDACTED.to_string())
	} else {
		output::redact_sensitive_values(&value)
	}
}
