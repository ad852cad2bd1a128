//! `LOGGING` configuration
//!
//! A self-contained description of log handlers and per-logger thresholds.
//! It is never merged with another logging source; the CLI turns it into a
//! `tracing` subscriber filter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Env var: threshold for the framework logger.
pub const ENV_LOG_LEVEL: &str = "DJANGO_LOG_LEVEL";

/// Name of the framework's root logger.
pub const FRAMEWORK_LOGGER: &str = "django";

/// Name of the handler that writes to the console.
pub const CONSOLE_HANDLER: &str = "console";

/// Severity threshold of a logger
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
	Notset,
	Debug,
	#[default]
	Info,
	Warning,
	Error,
	Critical,
}

impl LogLevel {
	/// Canonical upper-case name
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Notset => "NOTSET",
			LogLevel::Debug => "DEBUG",
			LogLevel::Info => "INFO",
			LogLevel::Warning => "WARNING",
			LogLevel::Error => "ERROR",
			LogLevel::Critical => "CRITICAL",
		}
	}

	/// Level name as written in a `tracing` filter directive
	pub fn directive(self) -> &'static str {
		match self {
			LogLevel::Notset => "trace",
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warning => "warn",
			LogLevel::Error | LogLevel::Critical => "error",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error for an unrecognised level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected DEBUG, INFO, WARNING, ERROR, CRITICAL or NOTSET)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
	type Err = ParseLogLevelError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_uppercase().as_str() {
			"NOTSET" => Ok(LogLevel::Notset),
			"DEBUG" => Ok(LogLevel::Debug),
			"INFO" => Ok(LogLevel::Info),
			"WARNING" | "WARN" => Ok(LogLevel::Warning),
			"ERROR" => Ok(LogLevel::Error),
			"CRITICAL" | "FATAL" => Ok(LogLevel::Critical),
			_ => Err(ParseLogLevelError(s.to_string())),
		}
	}
}

/// A log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum HandlerConfig {
	/// Unformatted records on stderr
	#[serde(rename = "logging.StreamHandler")]
	Console,
}

/// Threshold and outputs of one named logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
	pub handlers: Vec<String>,
	pub level: LogLevel,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	pub version: u32,
	pub disable_existing_loggers: bool,
	#[serde(default)]
	pub handlers: IndexMap<String, HandlerConfig>,
	#[serde(default)]
	pub loggers: IndexMap<String, LoggerConfig>,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			version: 1,
			disable_existing_loggers: false,
			handlers: IndexMap::new(),
			loggers: IndexMap::new(),
		}
	}
}

impl LoggingConfig {
	/// One console handler feeding the framework logger at `level`
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::logging::{LogLevel, LoggingConfig};
	///
	/// let logging = LoggingConfig::console(LogLevel::Warning);
	/// assert_eq!(logging.loggers["django"].level, LogLevel::Warning);
	/// assert_eq!(logging.loggers["django"].handlers, vec!["console"]);
	/// ```
	pub fn console(level: LogLevel) -> Self {
		let mut handlers = IndexMap::new();
		handlers.insert(CONSOLE_HANDLER.to_string(), HandlerConfig::Console);

		let mut loggers = IndexMap::new();
		loggers.insert(
			FRAMEWORK_LOGGER.to_string(),
			LoggerConfig {
				handlers: vec![CONSOLE_HANDLER.to_string()],
				level,
			},
		);

		Self {
			version: 1,
			disable_existing_loggers: false,
			handlers,
			loggers,
		}
	}

	/// Threshold of a named logger, if configured
	pub fn level_of(&self, logger: &str) -> Option<LogLevel> {
		self.loggers.get(logger).map(|l| l.level)
	}

	/// Filter directives (`target=level,...`) for `tracing_subscriber::EnvFilter`.
	///
	/// Loggers without any known handler are skipped since nothing would
	/// ever be written for them.
	pub fn env_filter_directives(&self) -> String {
		self.loggers
			.iter()
			.filter(|(_, logger)| {
				logger
					.handlers
					.iter()
					.any(|h| self.handlers.contains_key(h))
			})
			.map(|(name, logger)| format!("{}={}", name, logger.level.directive()))
			.collect::<Vec<_>>()
			.join(",")
	}
}
