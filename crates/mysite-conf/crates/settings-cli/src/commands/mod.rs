//! Subcommands and the settings resolution they share

pub(crate) mod check;
pub(crate) mod show;

use std::path::PathBuf;

use anyhow::Context;
use mysite_conf::settings::prelude::*;

/// Where settings are resolved from
#[derive(Debug, Clone)]
pub(crate) struct ResolveOptions {
	pub base_dir: PathBuf,
	pub env_file: Option<PathBuf>,
	pub no_local: bool,
}

impl ResolveOptions {
	/// Load the env file, if any, and resolve production settings from the
	/// process environment
	pub(crate) fn resolve(&self) -> anyhow::Result<Settings> {
		if let Some(env_file) = &self.env_file {
			dotenv::from_path(env_file)
				.with_context(|| format!("Cannot load env file {}", env_file.display()))?;
			tracing::debug!(path = %env_file.display(), "env file loaded");
		}

		let local = TomlFileSource::local(&self.base_dir);
		let overrides: Option<&dyn OverrideSource> = if self.no_local {
			None
		} else {
			Some(&local)
		};

		let settings = resolve(&ProcessEnv, Settings::base(), overrides)?;
		Ok(settings)
	}
}
