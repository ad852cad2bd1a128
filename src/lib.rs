//! # mysite
//!
//! Settings for the mysite Wagtail deployment.
//!
//! This crate is a thin facade over the workspace crates so that consumers
//! depend on one package and pick concerns with feature flags.
//!
//! ## Feature Flags
//!
//! - `conf` (default) - production settings resolution ([`conf`])
//!
//! ## Quick Start
//!
//! ```no_run
//! use mysite::prelude::*;
//!
//! let settings = resolve_from_process(".").expect("settings");
//! for issue in check_deployment(&settings) {
//!     eprintln!("{}", issue);
//! }
//! ```

#[cfg(feature = "conf")]
pub mod conf;

#[cfg(feature = "conf")]
pub use mysite_conf::settings::{DatabaseConfig, Settings, SettingsError, StorageBackend};

pub mod prelude {
	// Settings feature
	#[cfg(feature = "conf")]
	pub use mysite_conf::settings::prelude::*;
}

#[cfg(all(test, feature = "conf"))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn prelude_resolves_settings() {
		// Arrange
		let env = mysite_conf::settings::testing::production_env();

		// Act
		let settings = resolve(&env, Settings::base(), None).unwrap();

		// Assert
		assert!(!settings.debug);
		assert_eq!(settings.storages.default, StorageBackend::FileSystem);
	}
}
