//! Base settings shared by every environment
//!
//! Environment modules such as [`super::production`] start from
//! [`Settings::base`] and override individual fields.

use indexmap::IndexMap;
use std::path::PathBuf;

use super::Settings;
use super::logging::LoggingConfig;
use super::storage::Storages;

/// Applications installed in every environment, in load order.
pub const BASE_INSTALLED_APPS: &[&str] = &[
	"home",
	"search",
	"wagtail.contrib.forms",
	"wagtail.contrib.redirects",
	"wagtail.embeds",
	"wagtail.sites",
	"wagtail.users",
	"wagtail.snippets",
	"wagtail.documents",
	"wagtail.images",
	"wagtail.search",
	"wagtail.admin",
	"wagtail",
	"modelcluster",
	"taggit",
	"django.contrib.admin",
	"django.contrib.auth",
	"django.contrib.contenttypes",
	"django.contrib.sessions",
	"django.contrib.messages",
	"django.contrib.staticfiles",
];

/// Middleware chain shared by every environment, outermost first.
pub const BASE_MIDDLEWARE: &[&str] = &[
	"django.contrib.sessions.middleware.SessionMiddleware",
	"django.middleware.common.CommonMiddleware",
	"django.middleware.csrf.CsrfViewMiddleware",
	"django.contrib.auth.middleware.AuthenticationMiddleware",
	"django.contrib.messages.middleware.MessageMiddleware",
	"django.middleware.clickjacking.XFrameOptionsMiddleware",
	"django.middleware.security.SecurityMiddleware",
	"wagtail.contrib.redirects.middleware.RedirectMiddleware",
];

/// SMTP delivery, the framework default.
pub const SMTP_EMAIL_BACKEND: &str = "django.core.mail.backends.smtp.EmailBackend";

impl Settings {
	/// The shared base settings
	///
	/// # Examples
	///
	/// ```
	/// use mysite_conf::Settings;
	/// use mysite_conf::settings::StorageBackend;
	///
	/// let base = Settings::base();
	/// assert!(!base.debug);
	/// assert_eq!(base.storages.default, StorageBackend::FileSystem);
	/// assert!(base.allowed_hosts.is_empty());
	/// ```
	pub fn base() -> Self {
		Self {
			debug: false,
			secret_key: String::new(),
			allowed_hosts: Vec::new(),
			csrf_trusted_origins: Vec::new(),
			databases: IndexMap::new(),
			installed_apps: to_strings(BASE_INSTALLED_APPS),
			middleware: to_strings(BASE_MIDDLEWARE),
			storages: Storages::default(),
			static_url: "/static/".to_string(),
			static_root: PathBuf::from("static"),
			media_url: "/media/".to_string(),
			media_root: PathBuf::from("media"),
			email_backend: SMTP_EMAIL_BACKEND.to_string(),
			secure_proxy_ssl_header: None,
			secure_ssl_redirect: false,
			logging: LoggingConfig::default(),
			wagtail_site_name: "mysite".to_string(),
			wagtail_redirects_file_storage: None,
			extra: IndexMap::new(),
		}
	}
}

fn to_strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| s.to_string()).collect()
}
