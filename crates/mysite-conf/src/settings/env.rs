//! Environment variable handling module
//!
//! Provides typed access to environment variables. Lookups go through the
//! [`EnvSource`] trait so the resolver can run against the live process
//! environment or against an explicit map.

use indexmap::IndexMap;
use std::collections::HashMap;
use std::env::{self, VarError};

use super::env_parser::{DatabaseUrl, parse_database_url, parse_list};

/// A source of environment variables
pub trait EnvSource: Send + Sync {
	/// Look up a variable, `Ok(None)` when it is not set
	///
	/// A value that is set but unreadable (not valid UTF-8) is an error,
	/// never `None`.
	fn var(&self, key: &str) -> Result<Option<String>, EnvError>;

	/// Whether the variable is set at all (an empty value counts as set)
	fn contains(&self, key: &str) -> Result<bool, EnvError> {
		Ok(self.var(key)?.is_some())
	}
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
	fn var(&self, key: &str) -> Result<Option<String>, EnvError> {
		match env::var(key) {
			Ok(value) => Ok(Some(value)),
			Err(VarError::NotPresent) => Ok(None),
			Err(VarError::NotUnicode(raw)) => Err(EnvError::ParseError {
				key: key.to_string(),
				value_len: raw.len(),
				error: "value is not valid UTF-8".to_string(),
			}),
		}
	}
}

impl EnvSource for HashMap<String, String> {
	fn var(&self, key: &str) -> Result<Option<String>, EnvError> {
		Ok(self.get(key).cloned())
	}
}

impl EnvSource for IndexMap<String, String> {
	fn var(&self, key: &str) -> Result<Option<String>, EnvError> {
		Ok(self.get(key).cloned())
	}
}

/// Typed reader over an [`EnvSource`]
#[derive(Clone, Copy)]
pub struct Env<'a> {
	source: &'a dyn EnvSource,
}

impl<'a> Env<'a> {
	/// Create a reader over the given source
	pub fn new(source: &'a dyn EnvSource) -> Self {
		Self { source }
	}

	/// Whether `key` is present in the environment
	pub fn contains(&self, key: &str) -> Result<bool, EnvError> {
		validate_env_var_name(key)?;
		self.source.contains(key)
	}

	/// Read an optional string value
	pub fn optional(&self, key: &str) -> Result<Option<String>, EnvError> {
		validate_env_var_name(key)?;
		self.source.var(key)
	}
	/// Read a required string value
	///
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		self.str_with_default(key, None)
	}
	/// Read a string value with a default
	///
	pub fn str_with_default(&self, key: &str, default: Option<&str>) -> Result<String, EnvError> {
		match self.optional(key)? {
			Some(val) => Ok(val),
			None => match default {
				Some(d) => Ok(d.to_string()),
				None => Err(EnvError::MissingVariable(key.to_string())),
			},
		}
	}
	/// Read a list value (comma-separated)
	///
	pub fn list(&self, key: &str) -> Result<Vec<String>, EnvError> {
		self.list_with_default(key, None)
	}
	/// Read a list value with a default used when the variable is unset
	///
	pub fn list_with_default(
		&self,
		key: &str,
		default: Option<Vec<String>>,
	) -> Result<Vec<String>, EnvError> {
		match self.optional(key)? {
			Some(val) => Ok(parse_list(&val)),
			None => match default {
				Some(d) => Ok(d),
				None => Err(EnvError::MissingVariable(key.to_string())),
			},
		}
	}
	/// Read and parse a database URL
	///
	pub fn database_url(&self, key: &str) -> Result<DatabaseUrl, EnvError> {
		let url_str = self.str(key)?;

		parse_database_url(&url_str).map_err(|e| EnvError::ParseError {
			key: key.to_string(),
			value_len: url_str.len(),
			error: e,
		})
	}
}

impl std::fmt::Debug for Env<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Env").finish_non_exhaustive()
	}
}

/// Validates an environment variable name.
///
/// Rejects names that are empty, contain control characters, or contain
/// the `=` character (which is used as the key-value separator).
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}

/// Environment variable errors
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value (stored instead of the raw value to prevent secret leakage)
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}
