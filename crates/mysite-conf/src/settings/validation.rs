//! Deployment checks
//!
//! Inspects resolved settings for configurations that are unsafe to serve
//! production traffic with. Errors mean the site must not start; warnings
//! are reported to the operator.

use std::collections::HashSet;
use std::fmt;

use super::Settings;

const SECRET_KEY_MIN_LENGTH: usize = 50;
const SECRET_KEY_MIN_UNIQUE_CHARACTERS: usize = 5;
const SECRET_KEY_INSECURE_PREFIX: &str = "django-insecure";

/// How serious an [`Issue`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Severity::Warning => f.write_str("warning"),
			Severity::Error => f.write_str("error"),
		}
	}
}

/// A problem found in resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
	pub severity: Severity,
	/// Stable identifier, e.g. `security.W018`
	pub id: &'static str,
	pub message: String,
}

impl Issue {
	fn error(id: &'static str, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Error,
			id,
			message: message.into(),
		}
	}

	fn warning(id: &'static str, message: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			id,
			message: message.into(),
		}
	}
}

impl fmt::Display for Issue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}) {}: {}", self.id, self.severity, self.message)
	}
}

/// Run every deployment check against `settings`
///
/// # Examples
///
/// ```
/// use mysite_conf::Settings;
/// use mysite_conf::settings::validation::{Severity, check_deployment};
///
/// let issues = check_deployment(&Settings::base());
/// // The base settings carry no secret key
/// assert!(issues.iter().any(|i| i.severity == Severity::Error));
/// ```
pub fn check_deployment(settings: &Settings) -> Vec<Issue> {
	let mut issues = Vec::new();

	if settings.debug {
		issues.push(Issue::error(
			"security.W018",
			"DEBUG must be false in deployment",
		));
	}

	check_secret_key(&settings.secret_key, &mut issues);

	if settings.allowed_hosts.is_empty() {
		issues.push(Issue::error(
			"security.E020",
			"ALLOWED_HOSTS is empty; every request would be rejected",
		));
	} else if settings.allowed_hosts.iter().any(|h| h == "*") {
		issues.push(Issue::warning(
			"security.W020",
			"ALLOWED_HOSTS contains '*'; set DJANGO_ALLOWED_HOSTS to the served host names",
		));
	}

	if !settings.secure_ssl_redirect {
		issues.push(Issue::warning(
			"security.W008",
			"SECURE_SSL_REDIRECT is false; plain HTTP requests are not redirected",
		));
	}

	if settings.csrf_trusted_origins.is_empty() {
		issues.push(Issue::warning(
			"security.W030",
			"CSRF_TRUSTED_ORIGINS is empty; cross-origin form posts over HTTPS will fail",
		));
	}

	if let Some(store) = settings.object_store() {
		if store.bucket_name.is_empty() {
			issues.push(Issue::error(
				"storage.E001",
				"object storage is enabled but BUCKET_NAME is empty",
			));
		}
		if store.access_key_id.is_none() != store.secret_access_key.is_none() {
			issues.push(Issue::warning(
				"storage.W001",
				"only one of AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY is set",
			));
		}
	}

	issues
}

fn check_secret_key(secret_key: &str, issues: &mut Vec<Issue>) {
	if secret_key.is_empty() {
		issues.push(Issue::error("security.E009", "SECRET_KEY must not be empty"));
		return;
	}

	let unique: HashSet<char> = secret_key.chars().collect();
	if secret_key.starts_with(SECRET_KEY_INSECURE_PREFIX)
		|| secret_key.chars().count() < SECRET_KEY_MIN_LENGTH
		|| unique.len() < SECRET_KEY_MIN_UNIQUE_CHARACTERS
	{
		issues.push(Issue::warning(
			"security.W009",
			format!(
				"SECRET_KEY should be a random value of at least {} characters with at least {} unique characters",
				SECRET_KEY_MIN_LENGTH, SECRET_KEY_MIN_UNIQUE_CHARACTERS
			),
		));
	}
}

/// Whether any issue is an error
pub fn has_errors(issues: &[Issue]) -> bool {
	issues.iter().any(|i| i.severity == Severity::Error)
}
