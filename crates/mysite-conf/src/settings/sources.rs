//! Developer-local override sources
//!
//! An override source is read after every other setting has been assigned
//! and may replace any top-level key. A missing source is expected (most
//! deployments have none) and is reported as `Ok(None)`; every other
//! failure is an error.

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Settings, SettingsError};

/// Override file location, relative to the project base directory
pub const LOCAL_OVERRIDE_PATH: &str = "settings/local.toml";

/// Trait for override sources
pub trait OverrideSource: Send + Sync {
	/// Load the override values, or `None` when the source does not exist
	fn load(&self) -> Result<Option<IndexMap<String, Value>>, SourceError>;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for override sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("TOML error in {path}: {source}")]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("JSON error in {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

/// Read a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>, SourceError> {
	match fs::read_to_string(path) {
		Ok(content) => Ok(Some(content)),
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(SourceError::Io {
			path: path.to_path_buf(),
			source: e,
		}),
	}
}

fn into_table(value: Value, description: &str) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse(format!(
			"{}: expected a table at the root",
			description
		))),
	}
}

/// TOML file override source
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file override source
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::sources::{OverrideSource, TomlFileSource};
	///
	/// let source = TomlFileSource::new("settings/local.toml");
	/// assert_eq!(source.description(), "TOML file: settings/local.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// The conventional override file under `base_dir`
	pub fn local(base_dir: impl AsRef<Path>) -> Self {
		Self::new(base_dir.as_ref().join(LOCAL_OVERRIDE_PATH))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl OverrideSource for TomlFileSource {
	fn load(&self) -> Result<Option<IndexMap<String, Value>>, SourceError> {
		let Some(content) = read_optional(&self.path)? else {
			return Ok(None);
		};

		let table: toml::Table = toml::from_str(&content).map_err(|e| SourceError::Toml {
			path: self.path.clone(),
			source: e,
		})?;

		let value = serde_json::to_value(table).map_err(|e| SourceError::Parse(e.to_string()))?;
		into_table(value, &self.description()).map(Some)
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file override source
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	/// Create a new JSON file override source
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl OverrideSource for JsonFileSource {
	fn load(&self) -> Result<Option<IndexMap<String, Value>>, SourceError> {
		let Some(content) = read_optional(&self.path)? else {
			return Ok(None);
		};

		let value: Value = serde_json::from_str(&content).map_err(|e| SourceError::Json {
			path: self.path.clone(),
			source: e,
		})?;

		into_table(value, &self.description()).map(Some)
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

/// In-memory override values
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
	values: IndexMap<String, Value>,
}

impl MemorySource {
	/// Create an empty in-memory source
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::settings::sources::{MemorySource, OverrideSource};
	/// use serde_json::json;
	///
	/// let source = MemorySource::new().with_value("wagtail_site_name", json!("Staging"));
	/// let values = source.load().unwrap().unwrap();
	/// assert_eq!(values["wagtail_site_name"], json!("Staging"));
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an override value
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl OverrideSource for MemorySource {
	fn load(&self) -> Result<Option<IndexMap<String, Value>>, SourceError> {
		Ok(Some(self.values.clone()))
	}

	fn description(&self) -> String {
		"In-memory overrides".to_string()
	}
}

/// Pick an override source based on file extension
///
/// # Examples
///
/// ```
/// use mysite_conf::settings::sources::auto_source;
///
/// assert!(auto_source("settings/local.toml").is_ok());
/// assert!(auto_source("settings/local.json").is_ok());
/// assert!(auto_source("settings/local.py").is_err());
/// ```
pub fn auto_source(path: impl AsRef<Path>) -> Result<Box<dyn OverrideSource>, SourceError> {
	let path = path.as_ref();
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.ok_or_else(|| SourceError::InvalidSource("No file extension".to_string()))?;

	match ext {
		"toml" => Ok(Box::new(TomlFileSource::new(path))),
		"json" => Ok(Box::new(JsonFileSource::new(path))),
		_ => Err(SourceError::InvalidSource(format!(
			"Unsupported file extension: {}",
			ext
		))),
	}
}

/// Apply override values on top of `settings`.
///
/// Keys are matched case-insensitively and each one replaces the whole
/// top-level value. Keys without a dedicated field end up in
/// [`Settings::extra`].
pub fn apply_overrides(
	settings: Settings,
	overrides: IndexMap<String, Value>,
	source_desc: &str,
) -> Result<Settings, SettingsError> {
	if overrides.is_empty() {
		return Ok(settings);
	}

	let mut merged = match settings.to_value()? {
		Value::Object(map) => map,
		_ => {
			return Err(SettingsError::Serialization(
				"settings did not serialize to a map".to_string(),
			));
		}
	};

	for (key, value) in overrides {
		let key = key.to_lowercase();
		tracing::debug!(key = %key, source = %source_desc, "override applied");
		merged.insert(key, value);
	}

	serde_json::from_value(Value::Object(merged)).map_err(|e| SettingsError::InvalidOverride {
		source_desc: source_desc.to_string(),
		message: e.to_string(),
	})
}
