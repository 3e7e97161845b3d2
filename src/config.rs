//! Pipeline configuration
//!
//! The defaults reproduce the fixed extract job: FakeStore products to
//! `gs://ecomm-raw-data/raw/`. An optional YAML file can override any field.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default source endpoint
pub const DEFAULT_ENDPOINT: &str = "https://fakestoreapi.com/products";

/// Default destination bucket
pub const DEFAULT_BUCKET: &str = "ecomm-raw-data";

/// Default storage project
pub const DEFAULT_PROJECT_ID: &str = "lucid-destiny-475616-t5";

/// Default local staging directory
pub const DEFAULT_WORK_DIR: &str = "data";

/// Default object key prefix
pub const DEFAULT_PREFIX: &str = "raw";

/// Default artifact file stem
pub const DEFAULT_FILE_STEM: &str = "products";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Pipeline Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source URL returning a JSON array of records
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Destination bucket
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Project the storage requests are scoped to
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// Local staging directory
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Object key prefix inside the bucket
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Artifact file stem (`<stem>_<timestamp>.csv`)
    #[serde(default = "default_file_stem")]
    pub file_stem: String,

    /// Fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification on the fetch
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Destination override (`gs://bucket/prefix` or a local directory)
    ///
    /// A `gs://` URL replaces both bucket and prefix. A local directory
    /// replaces the bucket only; objects still land under `prefix`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORK_DIR)
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_file_stem() -> String {
    DEFAULT_FILE_STEM.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            bucket: default_bucket(),
            project_id: default_project_id(),
            work_dir: default_work_dir(),
            prefix: default_prefix(),
            file_stem: default_file_stem(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
            destination: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from YAML. Missing keys fall back to defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Check the config for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "endpoint must be an http(s) URL, got scheme '{}'",
                url.scheme()
            )));
        }
        if self.bucket.trim().is_empty() {
            return Err(Error::config("bucket must not be empty"));
        }
        if self.file_stem.trim().is_empty() {
            return Err(Error::config("file_stem must not be empty"));
        }
        if self.file_stem.contains(['/', '\\']) {
            return Err(Error::config("file_stem must not contain path separators"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    /// Fetch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upload destination URL
    pub fn destination_url(&self) -> String {
        let prefix = self.prefix.trim_matches('/');
        let root = match &self.destination {
            Some(dest) if dest.starts_with("gs://") => return dest.clone(),
            Some(dest) => dest.trim_end_matches('/').to_string(),
            None => format!("gs://{}", self.bucket),
        };
        if prefix.is_empty() {
            root
        } else {
            format!("{root}/{prefix}")
        }
    }

    /// Set the source endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the destination bucket
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the storage project
    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    /// Set the local staging directory
    #[must_use]
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Set the object key prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the fetch timeout in seconds
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Enable or disable TLS certificate verification bypass
    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Override the upload destination
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_fixed_job() {
        let config = PipelineConfig::default();
        assert_eq!(config.endpoint, "https://fakestoreapi.com/products");
        assert_eq!(config.bucket, "ecomm-raw-data");
        assert_eq!(config.project_id, "lucid-destiny-475616-t5");
        assert_eq!(config.work_dir, PathBuf::from("data"));
        assert_eq!(config.prefix, "raw");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.accept_invalid_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_destination_url() {
        let config = PipelineConfig::default();
        assert_eq!(config.destination_url(), "gs://ecomm-raw-data/raw");

        let config = PipelineConfig::default().with_prefix("");
        assert_eq!(config.destination_url(), "gs://ecomm-raw-data");

        let config = PipelineConfig::default().with_destination("/tmp/lake");
        assert_eq!(config.destination_url(), "/tmp/lake/raw");

        let config = PipelineConfig::default().with_destination("gs://other/landing");
        assert_eq!(config.destination_url(), "gs://other/landing");
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r"
bucket: other-bucket
work_dir: /tmp/staging
accept_invalid_certs: true
";
        let config = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.bucket, "other-bucket");
        assert_eq!(config.work_dir, PathBuf::from("/tmp/staging"));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        std::fs::write(&path, "timeout_secs: 3\nprefix: landing\n").unwrap();

        let config = PipelineConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.prefix, "landing");
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = PipelineConfig::from_yaml_file("/nonexistent/pipeline.yaml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = PipelineConfig::default()
            .with_endpoint("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = PipelineConfig::default()
            .with_endpoint("ftp://example.com/products")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        assert!(PipelineConfig::default()
            .with_bucket("  ")
            .validate()
            .is_err());
        assert!(PipelineConfig::default()
            .with_timeout_secs(0)
            .validate()
            .is_err());

        let mut config = PipelineConfig::default();
        config.file_stem = "a/b".to_string();
        assert!(config.validate().is_err());
    }
}
