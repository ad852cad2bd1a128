//! Check command

use crate::output;
use clap::Args;
use mysite_conf::Settings;
use mysite_conf::settings::validation::{Issue, Severity, check_deployment};

#[derive(Args)]
pub(crate) struct CheckArgs {
	/// Exit with an error when only warnings are found
	#[arg(long)]
	pub fail_on_warning: bool,
}

/// Run the deployment checks against the resolved settings
pub(crate) async fn execute(args: CheckArgs, settings: &Settings) -> anyhow::Result<()> {
	output::success("Settings resolved");

	let issues = check_deployment(settings);
	for issue in &issues {
		match issue.severity {
			Severity::Error => output::error(&issue.to_string()),
			Severity::Warning => output::warning(&issue.to_string()),
		}
	}

	let (errors, warnings) = count(&issues);
	if errors == 0 && warnings == 0 {
		output::success("No deployment issues found");
		return Ok(());
	}

	output::info(&format!("{} error(s), {} warning(s)", errors, warnings));

	if errors > 0 || (args.fail_on_warning && warnings > 0) {
		anyhow::bail!("Deployment check failed");
	}

	Ok(())
}

fn count(issues: &[Issue]) -> (usize, usize) {
	let errors = issues
		.iter()
		.filter(|i| i.severity == Severity::Error)
		.count();
	(errors, issues.len() - errors)
}
