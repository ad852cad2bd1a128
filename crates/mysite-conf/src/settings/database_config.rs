//! Database configuration for settings
//!
//! This module provides the `DatabaseConfig` struct, the connection
//! descriptor stored under `DATABASES`.

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use super::env_parser::DatabaseUrl;

/// Alias under which the primary connection is registered
pub const DEFAULT_DB_ALIAS: &str = "default";

/// Named database connections, `default` first
pub type Databases = IndexMap<String, DatabaseConfig>;

/// Database configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
	/// Database engine/backend
	pub engine: String,

	/// Database name or path
	pub name: String,

	/// Database user (if applicable)
	#[serde(default)]
	pub user: Option<String>,

	/// Database password (if applicable)
	#[serde(default)]
	pub password: Option<String>,

	/// Database host (if applicable)
	#[serde(default)]
	pub host: Option<String>,

	/// Database port (if applicable)
	#[serde(default)]
	pub port: Option<u16>,

	/// Additional options
	#[serde(default)]
	pub options: IndexMap<String, String>,

	/// Seconds a connection may be reused; `None` keeps connections open
	/// indefinitely and `Some(0)` closes them after every request
	#[serde(default = "default_conn_max_age")]
	pub conn_max_age: Option<u64>,

	/// Check that a persistent connection is alive before reusing it
	#[serde(default)]
	pub conn_health_checks: bool,
}

fn default_conn_max_age() -> Option<u64> {
	Some(0)
}

impl DatabaseConfig {
	/// Create a SQLite database configuration
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::DatabaseConfig;
	///
	/// let db = DatabaseConfig::sqlite("db.sqlite3");
	///
	/// assert_eq!(db.engine, "django.db.backends.sqlite3");
	/// assert_eq!(db.name, "db.sqlite3");
	/// assert!(db.user.is_none());
	/// ```
	pub fn sqlite(name: impl Into<String>) -> Self {
		Self {
			engine: engine_for_scheme("sqlite").to_string(),
			name: name.into(),
			user: None,
			password: None,
			host: None,
			port: None,
			options: IndexMap::new(),
			conn_max_age: default_conn_max_age(),
			conn_health_checks: false,
		}
	}

	/// Build a configuration from a parsed database URL
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::DatabaseConfig;
	/// use mysite_conf::settings::env_parser::parse_database_url;
	///
	/// let url = parse_database_url("postgres://app:pw@db:5432/mysite").unwrap();
	/// let db = DatabaseConfig::from_url(&url);
	///
	/// assert_eq!(db.engine, "django.db.backends.postgresql");
	/// assert_eq!(db.host.as_deref(), Some("db"));
	/// assert_eq!(db.port, Some(5432));
	/// ```
	pub fn from_url(url: &DatabaseUrl) -> Self {
		Self {
			engine: engine_for_scheme(&url.scheme).to_string(),
			name: url.database.clone(),
			user: url.username.clone(),
			password: url.password.clone(),
			host: url.host.clone(),
			port: url.port,
			options: url.options.clone(),
			conn_max_age: default_conn_max_age(),
			conn_health_checks: false,
		}
	}

	/// Set the persistent connection policy
	pub fn with_connection_policy(mut self, max_age_secs: Option<u64>, health_checks: bool) -> Self {
		self.conn_max_age = max_age_secs;
		self.conn_health_checks = health_checks;
		self
	}

	/// Convert DatabaseConfig to DATABASE_URL string
	///
	/// The result includes credentials; redact it before display.
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::DatabaseConfig;
	///
	/// let db = DatabaseConfig::sqlite("db.sqlite3");
	/// assert_eq!(db.to_url(), "sqlite:///db.sqlite3");
	///
	/// let db = DatabaseConfig::sqlite(":memory:");
	/// assert_eq!(db.to_url(), "sqlite://:memory:");
	/// ```
	pub fn to_url(&self) -> String {
		let scheme = scheme_for_engine(&self.engine);

		if scheme == "sqlite" || scheme == "spatialite" {
			if self.name == ":memory:" {
				return format!("{}://:memory:", scheme);
			}
			return format!("{}:///{}", scheme, self.name);
		}

		let mut url = format!("{}://", scheme);

		if let Some(user) = &self.user {
			url.push_str(&encode(user));
			if let Some(password) = &self.password {
				url.push(':');
				url.push_str(&encode(password));
			}
			url.push('@');
		}

		if let Some(host) = &self.host {
			if host.contains(':') {
				// IPv6 literal
				url.push('[');
				url.push_str(host);
				url.push(']');
			} else {
				url.push_str(&encode(host));
			}
		}

		if let Some(port) = self.port {
			url.push(':');
			url.push_str(&port.to_string());
		}

		url.push('/');
		url.push_str(&encode(&self.name));

		if !self.options.is_empty() {
			let query: Vec<String> = self
				.options
				.iter()
				.map(|(key, value)| format!("{}={}", encode(key), encode(value)))
				.collect();
			url.push('?');
			url.push_str(&query.join("&"));
		}

		url
	}
}

impl std::fmt::Debug for DatabaseConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DatabaseConfig")
			.field("engine", &self.engine)
			.field("name", &self.name)
			.field("user", &self.user)
			.field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
			.field("host", &self.host)
			.field("port", &self.port)
			.field("options", &self.options)
			.field("conn_max_age", &self.conn_max_age)
			.field("conn_health_checks", &self.conn_health_checks)
			.finish()
	}
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self::sqlite("db.sqlite3")
	}
}

/// Backend identifier for a URL scheme
pub fn engine_for_scheme(scheme: &str) -> &'static str {
	match scheme {
		"postgres" | "postgresql" | "pgsql" => "django.db.backends.postgresql",
		"postgis" => "django.contrib.gis.db.backends.postgis",
		"mysql" | "mysql2" => "django.db.backends.mysql",
		"mysqlgis" => "django.contrib.gis.db.backends.mysql",
		"spatialite" => "django.contrib.gis.db.backends.spatialite",
		"oracle" => "django.db.backends.oracle",
		_ => "django.db.backends.sqlite3",
	}
}

fn scheme_for_engine(engine: &str) -> &'static str {
	if engine.contains("postgis") {
		"postgis"
	} else if engine.contains("postgres") {
		"postgresql"
	} else if engine.contains("gis") && engine.contains("mysql") {
		"mysqlgis"
	} else if engine.contains("mysql") {
		"mysql"
	} else if engine.contains("spatialite") {
		"spatialite"
	} else if engine.contains("oracle") {
		"oracle"
	} else {
		"sqlite"
	}
}

const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'.')
	.remove(b'-')
	.remove(b'_')
	.remove(b'~');

fn encode(part: &str) -> String {
	utf8_percent_encode(part, URL_COMPONENT).to_string()
}
