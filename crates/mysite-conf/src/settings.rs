//! Settings record and the modules that build it
//!
//! [`Settings`] is the full configuration of one running site. It is built
//! once at startup (see [`production::resolve`]) and passed to consumers
//! explicitly; nothing in this crate keeps it in global state.

pub mod base;
pub mod database_config;
pub mod env;
pub mod env_parser;
pub mod logging;
pub mod prelude;
pub mod production;
pub mod security;
pub mod sources;
pub mod storage;
pub mod testing;
pub mod validation;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

pub use database_config::{DatabaseConfig, Databases};
pub use env::EnvError;
pub use logging::{LogLevel, LoggingConfig};
pub use security::ProxySslHeader;
pub use sources::SourceError;
pub use storage::{ObjectStoreConfig, StorageBackend, Storages};

/// Configuration of a running site
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
	/// Debug mode
	#[serde(default)]
	pub debug: bool,

	/// Secret key for cryptographic signing
	#[serde(default)]
	pub secret_key: String,

	/// Host names this site may serve
	#[serde(default)]
	pub allowed_hosts: Vec<String>,

	/// Origins allowed to send unsafe cross-site requests
	#[serde(default)]
	pub csrf_trusted_origins: Vec<String>,

	/// Database connections by alias
	#[serde(default)]
	pub databases: Databases,

	/// Installed applications, in load order
	#[serde(default)]
	pub installed_apps: Vec<String>,

	/// Middleware chain, outermost first
	#[serde(default)]
	pub middleware: Vec<String>,

	/// Media and static file storage
	#[serde(default)]
	pub storages: Storages,

	pub static_url: String,
	pub static_root: PathBuf,
	pub media_url: String,
	pub media_root: PathBuf,

	/// Email delivery backend
	pub email_backend: String,

	/// Header that proves TLS was terminated upstream
	#[serde(default)]
	pub secure_proxy_ssl_header: Option<ProxySslHeader>,

	/// Redirect plain HTTP requests to HTTPS
	#[serde(default)]
	pub secure_ssl_redirect: bool,

	/// Logging configuration
	#[serde(default)]
	pub logging: LoggingConfig,

	/// Display name of the site in the CMS admin
	pub wagtail_site_name: String,

	/// Where imported redirect files are kept between upload and import
	#[serde(default)]
	pub wagtail_redirects_file_storage: Option<String>,

	/// Additional settings without a dedicated field
	#[serde(flatten)]
	pub extra: IndexMap<String, Value>,
}

impl Settings {
	/// The `default` database connection
	pub fn default_database(&self) -> Option<&DatabaseConfig> {
		self.databases.get(database_config::DEFAULT_DB_ALIAS)
	}

	/// Object storage configuration, when media is stored in a bucket
	pub fn object_store(&self) -> Option<&ObjectStoreConfig> {
		match &self.storages.default {
			StorageBackend::ObjectStore(config) => Some(config),
			_ => None,
		}
	}

	/// Serialize into a key/value map
	pub fn to_value(&self) -> Result<Value, SettingsError> {
		serde_json::to_value(self).map_err(|e| SettingsError::Serialization(e.to_string()))
	}

	/// Look up a setting by key, descending into nested values with dots
	///
	/// Keys are case-insensitive at the top level.
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::Settings;
	///
	/// let settings = Settings::base();
	/// assert_eq!(settings.get("DEBUG"), Some(serde_json::Value::Bool(false)));
	/// assert_eq!(
	///     settings.get("storages.default.backend"),
	///     Some(serde_json::Value::String("file_system".into()))
	/// );
	/// ```
	pub fn get(&self, key: &str) -> Option<Value> {
		let root = self.to_value().ok()?;
		let mut parts = key.split('.');
		let first = parts.next()?.to_lowercase();
		let mut current = root.get(&first)?;

		for part in parts {
			current = match current {
				Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
				other => other.get(part)?,
			};
		}

		Some(current.clone())
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self::base()
	}
}

impl std::fmt::Debug for Settings {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Settings")
			.field("debug", &self.debug)
			.field("secret_key", &"[REDACTED]")
			.field("allowed_hosts", &self.allowed_hosts)
			.field("csrf_trusted_origins", &self.csrf_trusted_origins)
			.field("databases", &self.databases)
			.field("installed_apps", &self.installed_apps)
			.field("middleware", &self.middleware)
			.field("storages", &self.storages)
			.field("static_url", &self.static_url)
			.field("static_root", &self.static_root)
			.field("media_url", &self.media_url)
			.field("media_root", &self.media_root)
			.field("email_backend", &self.email_backend)
			.field("secure_proxy_ssl_header", &self.secure_proxy_ssl_header)
			.field("secure_ssl_redirect", &self.secure_ssl_redirect)
			.field("logging", &self.logging)
			.field("wagtail_site_name", &self.wagtail_site_name)
			.field(
				"wagtail_redirects_file_storage",
				&self.wagtail_redirects_file_storage,
			)
			.field("extra", &self.extra.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Settings resolution errors
///
/// Every variant is fatal: a process that gets one must not start serving.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error(transparent)]
	Env(#[from] EnvError),

	#[error("Invalid value for {key}: {source}")]
	InvalidLogLevel {
		key: &'static str,
		#[source]
		source: logging::ParseLogLevelError,
	},

	#[error("Override source error: {0}")]
	Source(#[from] SourceError),

	#[error("Invalid override from {source_desc}: {message}")]
	InvalidOverride {
		source_desc: String,
		message: String,
	},

	#[error("Serialization error: {0}")]
	Serialization(String),
}
