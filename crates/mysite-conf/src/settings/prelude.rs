//! Prelude module for convenient imports
//!
//! Import this module to get access to the most commonly used types and traits.

pub use super::database_config::{DEFAULT_DB_ALIAS, DatabaseConfig, Databases};
pub use super::env::{Env, EnvError, EnvSource, ProcessEnv};
pub use super::env_parser::{DatabaseUrl, parse_database_url, parse_list};
pub use super::logging::{LogLevel, LoggingConfig};
pub use super::production::{resolve, resolve_from_process};
pub use super::security::ProxySslHeader;
pub use super::sources::{
	JsonFileSource, MemorySource, OverrideSource, SourceError, TomlFileSource, auto_source,
};
pub use super::storage::{ObjectStoreConfig, StorageBackend, Storages};
pub use super::validation::{Issue, Severity, check_deployment, has_errors};
pub use super::{Settings, SettingsError};
