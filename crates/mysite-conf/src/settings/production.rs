//! Production settings
//!
//! [`resolve`] turns the base settings, the environment and an optional
//! local override source into the settings a production process runs with.
//! Assignments happen in a fixed order and later steps win: scalar keys are
//! replaced, the middleware chain is extended, and only the named storage
//! aliases are changed.
//!
//! ## Environment Variables
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SECRET_KEY` | yes | |
//! | `DATABASE_URL` | yes | |
//! | `DJANGO_ALLOWED_HOSTS` | no | `*` |
//! | `DJANGO_CSRF_TRUSTED_ORIGINS` | no | empty |
//! | `DJANGO_LOG_LEVEL` | no | `INFO` |
//! | `BUCKET_NAME` | no | object storage off |
//! | `AWS_REGION`, `AWS_ENDPOINT_URL_S3`, `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` | no | read only with `BUCKET_NAME` |

use std::path::Path;

use super::database_config::DEFAULT_DB_ALIAS;
use super::env::{Env, EnvSource, ProcessEnv};
use super::logging::{ENV_LOG_LEVEL, LogLevel, LoggingConfig};
use super::security::ProxySslHeader;
use super::sources::{OverrideSource, TomlFileSource, apply_overrides};
use super::storage::{OBJECT_STORAGE_APP, ObjectStoreConfig, StorageBackend};
use super::{DatabaseConfig, Settings, SettingsError};

/// Env var: signing secret.
pub const ENV_SECRET_KEY: &str = "SECRET_KEY";
/// Env var: primary database URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Env var: comma-separated host allowlist.
pub const ENV_ALLOWED_HOSTS: &str = "DJANGO_ALLOWED_HOSTS";
/// Env var: comma-separated CSRF origin allowlist.
pub const ENV_CSRF_TRUSTED_ORIGINS: &str = "DJANGO_CSRF_TRUSTED_ORIGINS";

/// Seconds a database connection is kept for reuse.
pub const CONN_MAX_AGE: u64 = 600;

/// Static file serving middleware appended to the base chain.
pub const STATIC_FILES_MIDDLEWARE: &str = "whitenoise.middleware.WhiteNoiseMiddleware";

/// Email backend that writes messages to stdout.
pub const CONSOLE_EMAIL_BACKEND: &str = "django.core.mail.backends.console.EmailBackend";

/// Storage used for redirect import files; uploads are kept in the cache
/// so they survive across processes without touching shared disk.
pub const REDIRECTS_FILE_STORAGE: &str = "cache";

/// Resolve production settings.
///
/// Fails when `SECRET_KEY` or `DATABASE_URL` is missing, when the database
/// URL cannot be parsed, when `DJANGO_LOG_LEVEL` is not a known level, or
/// when an override source exists but cannot be read or applied. An
/// override source that does not exist is skipped.
pub fn resolve(
	env: &dyn EnvSource,
	base: Settings,
	overrides: Option<&dyn OverrideSource>,
) -> Result<Settings, SettingsError> {
	let env = Env::new(env);
	let mut settings = base;

	settings.debug = false;

	let database_url = env.database_url(ENV_DATABASE_URL)?;
	let database =
		DatabaseConfig::from_url(&database_url).with_connection_policy(Some(CONN_MAX_AGE), true);
	tracing::debug!(engine = %database.engine, "default database configured");
	settings
		.databases
		.insert(DEFAULT_DB_ALIAS.to_string(), database);

	settings.secret_key = env.str(ENV_SECRET_KEY)?;

	settings.secure_proxy_ssl_header = Some(ProxySslHeader::forwarded_proto_https());
	settings.secure_ssl_redirect = true;

	settings.allowed_hosts = env.list_with_default(ENV_ALLOWED_HOSTS, Some(vec!["*".to_string()]))?;
	settings.csrf_trusted_origins = env.list_with_default(ENV_CSRF_TRUSTED_ORIGINS, Some(Vec::new()))?;

	settings.email_backend = CONSOLE_EMAIL_BACKEND.to_string();

	settings.middleware.push(STATIC_FILES_MIDDLEWARE.to_string());
	settings.storages.staticfiles = StorageBackend::CompressedManifestStaticFiles;

	if let Some(object_store) = ObjectStoreConfig::from_env(&env)? {
		if object_store.bucket_name.is_empty() {
			tracing::warn!("BUCKET_NAME is set but empty; object storage enabled anyway");
		}
		tracing::info!(
			bucket = %object_store.bucket_name,
			endpoint = ?object_store.endpoint_url,
			"media stored in object storage"
		);
		settings.installed_apps.push(OBJECT_STORAGE_APP.to_string());
		settings.storages.default = StorageBackend::ObjectStore(object_store);
	}

	settings.logging = LoggingConfig::console(log_level(&env)?);

	settings.wagtail_redirects_file_storage = Some(REDIRECTS_FILE_STORAGE.to_string());

	if let Some(source) = overrides {
		settings = apply_override_source(settings, source)?;
	}

	Ok(settings)
}

/// Resolve production settings from the process environment, using
/// `settings/local.toml` under `base_dir` as the override source.
pub fn resolve_from_process(base_dir: impl AsRef<Path>) -> Result<Settings, SettingsError> {
	let local = TomlFileSource::local(base_dir);
	resolve(&ProcessEnv, Settings::base(), Some(&local))
}

fn log_level(env: &Env<'_>) -> Result<LogLevel, SettingsError> {
	match env.optional(ENV_LOG_LEVEL)? {
		Some(raw) => raw
			.parse()
			.map_err(|source| SettingsError::InvalidLogLevel {
				key: ENV_LOG_LEVEL,
				source,
			}),
		None => Ok(LogLevel::Info),
	}
}

fn apply_override_source(
	settings: Settings,
	source: &dyn OverrideSource,
) -> Result<Settings, SettingsError> {
	let description = source.description();

	let Some(values) = source.load()? else {
		tracing::debug!(source = %description, "no local overrides");
		return Ok(settings);
	};

	tracing::info!(source = %description, keys = values.len(), "applying local overrides");
	let merged = apply_overrides(settings, values, &description)?;

	if merged.debug {
		tracing::warn!(source = %description, "local overrides enabled DEBUG");
	}

	Ok(merged)
}
