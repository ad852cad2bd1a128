//! # mysite configuration
//!
//! Environment-driven settings for the mysite Wagtail deployment.
//!
//! The production settings are resolved once at process start from three
//! inputs: the shared base settings, the process environment and an optional
//! developer-local override file. The result is a plain [`Settings`] value
//! that is handed to every consumer explicitly.
//!
//! ## Quick Start
//!
//! ```
//! use mysite_conf::settings::production::resolve;
//! use mysite_conf::Settings;
//! use std::collections::HashMap;
//!
//! let env: HashMap<String, String> = [
//!     ("SECRET_KEY", "k3y-for-docs"),
//!     ("DATABASE_URL", "postgres://app:pw@db:5432/mysite"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let settings = resolve(&env, Settings::base(), None).unwrap();
//! assert!(!settings.debug);
//! assert_eq!(settings.allowed_hosts, vec!["*"]);
//! ```
//!
//! ## Module Organization
//!
//! - [`settings`]: settings record, environment access and the production resolver

pub mod settings;

// Re-export commonly used types at the crate root for convenience
pub use settings::{DatabaseConfig, Settings, SettingsError};
