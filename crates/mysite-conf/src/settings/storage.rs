//! Storage backend selection for `STORAGES`.
//!
//! Media files go to the local filesystem unless a bucket is configured, in
//! which case they go to S3-compatible object storage. Static files are
//! always served by the compressed manifest storage in production.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::env::{Env, EnvError};

/// Env var: bucket name; its presence alone switches media to object storage.
pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";
/// Env var: object storage region.
pub const ENV_AWS_REGION: &str = "AWS_REGION";
/// Env var: custom S3 endpoint (MinIO, Tigris, R2, ...).
pub const ENV_AWS_ENDPOINT_URL_S3: &str = "AWS_ENDPOINT_URL_S3";
/// Env var: object storage access key id.
pub const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Env var: object storage secret access key.
pub const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Cache lifetime attached to uploaded objects.
pub const OBJECT_CACHE_CONTROL: &str = "max-age=86400";

/// App that provides the object storage backend.
pub const OBJECT_STORAGE_APP: &str = "storages";

/// A storage backend the framework can be pointed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageBackend {
	/// Files under `MEDIA_ROOT` on local disk
	FileSystem,
	/// Plain collected static files
	StaticFiles,
	/// Compressed static files with hashed, cache-busting names
	CompressedManifestStaticFiles,
	/// S3-compatible bucket
	ObjectStore(ObjectStoreConfig),
}

impl StorageBackend {
	/// Dotted path of the backend class the framework loads.
	pub fn backend_path(&self) -> &'static str {
		match self {
			StorageBackend::FileSystem => "django.core.files.storage.FileSystemStorage",
			StorageBackend::StaticFiles => "django.contrib.staticfiles.storage.StaticFilesStorage",
			StorageBackend::CompressedManifestStaticFiles => {
				"whitenoise.storage.CompressedManifestStaticFilesStorage"
			}
			StorageBackend::ObjectStore(_) => "storages.backends.s3boto3.S3Boto3Storage",
		}
	}

	/// Whether files are kept outside the application host.
	pub fn is_remote(&self) -> bool {
		matches!(self, StorageBackend::ObjectStore(_))
	}
}

impl std::fmt::Display for StorageBackend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.backend_path())
	}
}

/// The `default` (media) and `staticfiles` storage aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storages {
	pub default: StorageBackend,
	pub staticfiles: StorageBackend,
}

impl Default for Storages {
	fn default() -> Self {
		Self {
			default: StorageBackend::FileSystem,
			staticfiles: StorageBackend::StaticFiles,
		}
	}
}

/// Credentials and location of the media bucket.
///
/// The five connection fields always travel together. Companion values
/// that were not set in the environment are `None`, never missing.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
	pub bucket_name: String,
	pub region_name: Option<String>,
	pub endpoint_url: Option<String>,
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<String>,
	/// Extra parameters sent with every uploaded object
	#[serde(default = "default_object_parameters")]
	pub object_parameters: IndexMap<String, String>,
}

fn default_object_parameters() -> IndexMap<String, String> {
	IndexMap::from([("CacheControl".to_string(), OBJECT_CACHE_CONTROL.to_string())])
}

impl ObjectStoreConfig {
	/// Create a configuration for `bucket` with no companion values set.
	pub fn new(bucket_name: impl Into<String>) -> Self {
		Self {
			bucket_name: bucket_name.into(),
			region_name: None,
			endpoint_url: None,
			access_key_id: None,
			secret_access_key: None,
			object_parameters: default_object_parameters(),
		}
	}

	/// Read the bucket configuration from the environment.
	///
	/// Returns `Ok(None)` when `BUCKET_NAME` is not set. When it is set, all
	/// four companion variables are read as well, whether or not they exist.
	pub fn from_env(env: &Env<'_>) -> Result<Option<Self>, EnvError> {
		if !env.contains(ENV_BUCKET_NAME)? {
			return Ok(None);
		}

		Ok(Some(Self {
			bucket_name: env.str_with_default(ENV_BUCKET_NAME, Some(""))?,
			region_name: env.optional(ENV_AWS_REGION)?,
			endpoint_url: env.optional(ENV_AWS_ENDPOINT_URL_S3)?,
			access_key_id: env.optional(ENV_AWS_ACCESS_KEY_ID)?,
			secret_access_key: env.optional(ENV_AWS_SECRET_ACCESS_KEY)?,
			object_parameters: default_object_parameters(),
		}))
	}
}

impl std::fmt::Debug for ObjectStoreConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObjectStoreConfig")
			.field("bucket_name", &self.bucket_name)
			.field("region_name", &self.region_name)
			.field("endpoint_url", &self.endpoint_url)
			.field("access_key_id", &self.access_key_id)
			.field(
				"secret_access_key",
				&self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
			)
			.field("object_parameters", &self.object_parameters)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::collections::HashMap;

	fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	fn test_no_bucket_means_no_object_store() {
		let source = vars(&[(ENV_AWS_REGION, "eu-west-1")]);

		let config = ObjectStoreConfig::from_env(&Env::new(&source)).unwrap();

		assert!(config.is_none());
	}

	#[rstest]
	fn test_bucket_alone_yields_full_config() {
		let source = vars(&[(ENV_BUCKET_NAME, "my-bucket")]);

		let config = ObjectStoreConfig::from_env(&Env::new(&source))
			.unwrap()
			.unwrap();

		assert_eq!(config, ObjectStoreConfig::new("my-bucket"));
		assert_eq!(config.object_parameters["CacheControl"], "max-age=86400");
	}

	#[rstest]
	fn test_all_companions_are_read() {
		let source = vars(&[
			(ENV_BUCKET_NAME, "media"),
			(ENV_AWS_REGION, "auto"),
			(ENV_AWS_ENDPOINT_URL_S3, "https://fly.storage.tigris.dev"),
			(ENV_AWS_ACCESS_KEY_ID, "tid_abc"),
			(ENV_AWS_SECRET_ACCESS_KEY, "tsec_xyz"),
		]);

		let config = ObjectStoreConfig::from_env(&Env::new(&source))
			.unwrap()
			.unwrap();

		assert_eq!(config.region_name.as_deref(), Some("auto"));
		assert_eq!(
			config.endpoint_url.as_deref(),
			Some("https://fly.storage.tigris.dev")
		);
		assert_eq!(config.access_key_id.as_deref(), Some("tid_abc"));
		assert_eq!(config.secret_access_key.as_deref(), Some("tsec_xyz"));
		assert!(!format!("{:?}", config).contains("tsec_xyz"));
	}

	#[rstest]
	fn test_object_store_serializes_every_field() {
		let backend = StorageBackend::ObjectStore(ObjectStoreConfig::new("b"));

		let value = serde_json::to_value(&backend).unwrap();

		assert_eq!(
			value,
			json!({
				"backend": "object_store",
				"bucket_name": "b",
				"region_name": null,
				"endpoint_url": null,
				"access_key_id": null,
				"secret_access_key": null,
				"object_parameters": {"CacheControl": "max-age=86400"},
			})
		);
	}

	#[rstest]
	#[case(StorageBackend::FileSystem, "django.core.files.storage.FileSystemStorage")]
	#[case(
		StorageBackend::CompressedManifestStaticFiles,
		"whitenoise.storage.CompressedManifestStaticFilesStorage"
	)]
	#[case(
		StorageBackend::ObjectStore(ObjectStoreConfig::new("b")),
		"storages.backends.s3boto3.S3Boto3Storage"
	)]
	fn test_backend_path(#[case] backend: StorageBackend, #[case] path: &str) {
		assert_eq!(backend.backend_path(), path);
		assert_eq!(backend.to_string(), path);
	}
}
