//! Configuration and settings module.
//!
//! # Examples
//!
//! ```
//! use mysite::conf::Settings;
//!
//! let settings = Settings::default();
//! assert!(!settings.debug);
//! ```

pub use mysite_conf::*;
