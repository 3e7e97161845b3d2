//! Object storage upload (GCS, local filesystem)

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::gcp::{GcpCredentialProvider, GoogleCloudStorageBuilder};
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ClientOptions, CredentialProvider, ObjectStore, PutMode};
use reqwest::header::{HeaderMap, HeaderValue};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Header scoping GCS requests to a project
pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

/// An uploaded copy of a local artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Full URI, e.g. `gs://ecomm-raw-data/raw/products_20251014_093005.csv`
    pub uri: String,
    /// Object key inside the bucket
    pub key: String,
    /// Bytes uploaded
    pub size: u64,
}

/// Upload destination backed by an object store
#[derive(Debug, Clone)]
pub struct Uploader {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Bucket name, or the root directory for local stores
    bucket: String,
    /// Key prefix within the bucket
    prefix: String,
    /// URL scheme for reporting
    scheme: String,
    /// Checked once before each put so missing credentials surface as auth errors
    credentials: Option<GcpCredentialProvider>,
}

impl Uploader {
    /// Destination described by a pipeline config
    ///
    /// Without a `destination` override this is `gs://{bucket}/{prefix}`. A
    /// `gs://` override carries its own prefix; a local directory override
    /// keeps the configured prefix.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        match config.destination.as_deref() {
            None => Self::gcs(&config.bucket, &config.prefix, &config.project_id),
            Some(url) => {
                let mut uploader = Self::parse(url, &config.project_id)?;
                if !uploader.is_cloud() {
                    uploader.prefix = config.prefix.trim_matches('/').to_string();
                }
                Ok(uploader)
            }
        }
    }

    /// Parse a destination URL and create the matching store
    ///
    /// Supported formats:
    /// - `gs://bucket/prefix` - Google Cloud Storage
    /// - `/local/path/` or `file:///local/path/` - Local filesystem
    pub fn parse(url: &str, project_id: &str) -> Result<Self> {
        if let Some(without_scheme) = url.strip_prefix("gs://") {
            let (bucket, prefix) = match without_scheme.find('/') {
                Some(idx) => (&without_scheme[..idx], &without_scheme[idx + 1..]),
                None => (without_scheme, ""),
            };
            if bucket.is_empty() {
                return Err(Error::config(format!("Invalid GCS URL: {url}")));
            }
            Self::gcs(bucket, prefix, project_id)
        } else if url.contains("://") && !url.starts_with("file://") {
            Err(Error::config(format!("Unsupported destination: {url}")))
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            Self::local(path, "")
        }
    }

    /// Google Cloud Storage with ambient credentials, scoped to a project
    pub fn gcs(bucket: &str, prefix: &str, project_id: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let project = HeaderValue::from_str(project_id)
            .map_err(|e| Error::config(format!("Invalid project id '{project_id}': {e}")))?;
        headers.insert(USER_PROJECT_HEADER, project);

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .with_client_options(ClientOptions::new().with_default_headers(headers))
            .build()
            .map_err(|e| Error::auth(format!("Failed to create GCS client: {e}")))?;

        let credentials = Arc::clone(store.credentials());
        Ok(Self::from_store(Arc::new(store), "gs", bucket, prefix)
            .with_credentials(credentials))
    }

    /// Local directory standing in for a bucket
    pub fn local(root: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;

        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        let root_display = root.display().to_string();
        Ok(Self::from_store(
            Arc::new(store),
            "file",
            root_display.trim_end_matches('/'),
            prefix,
        ))
    }

    /// Wrap an existing store
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        scheme: &str,
        bucket: &str,
        prefix: &str,
    ) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            prefix: prefix.trim_matches('/').to_string(),
            scheme: scheme.to_string(),
            credentials: None,
        }
    }

    /// Resolve a credential from this provider before every upload
    #[must_use]
    pub fn with_credentials(mut self, credentials: GcpCredentialProvider) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Get the scheme (gs, file, ...)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Object key for a filename: `{prefix}/{filename}`
    pub fn object_key(&self, filename: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(filename)
        } else {
            ObjectPath::from(format!("{}/{filename}", self.prefix))
        }
    }

    /// Full URI of an object key
    pub fn uri(&self, key: &ObjectPath) -> String {
        format!("{}://{}/{key}", self.scheme, self.bucket)
    }

    /// Upload a local file under its own filename
    pub async fn upload_file(&self, local_path: impl AsRef<Path>) -> Result<RemoteObject> {
        let local_path = local_path.as_ref();
        let filename = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::upload(format!("No file name in {}", local_path.display())))?;

        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| Error::io(local_path, e))?;

        self.upload_bytes(filename, Bytes::from(data)).await
    }

    /// Upload bytes under `{prefix}/{filename}`
    ///
    /// The object is created, never replaced: an existing key fails.
    pub async fn upload_bytes(&self, filename: &str, data: Bytes) -> Result<RemoteObject> {
        let key = self.object_key(filename);
        let size = data.len() as u64;

        // The GCS client falls back to the metadata server when nothing is
        // configured, so absent credentials only show up on first use.
        if let Some(credentials) = &self.credentials {
            credentials.get_credential().await.map_err(|e| {
                Error::auth(format!("No usable storage credentials for {key}: {e}"))
            })?;
        }

        self.store
            .put_opts(&key, data.into(), PutMode::Create.into())
            .await
            .map_err(|e| classify_store_error(&key, e))?;

        let uri = self.uri(&key);
        debug!("Put {} bytes at {}", size, uri);

        Ok(RemoteObject {
            uri,
            key: key.to_string(),
            size,
        })
    }
}

/// Map a store error onto the auth/upload split
pub(crate) fn classify_store_error(key: &ObjectPath, err: object_store::Error) -> Error {
    match &err {
        object_store::Error::Unauthenticated { .. }
        | object_store::Error::PermissionDenied { .. } => {
            Error::auth(format!("Not authorized to write {key}: {err}"))
        }
        object_store::Error::AlreadyExists { .. } => {
            Error::upload(format!("Object {key} already exists"))
        }
        _ => Error::upload(format!("Failed to write {key}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let dest = Uploader::parse(path, "proj").unwrap();
        assert_eq!(dest.scheme(), "file");
        assert!(!dest.is_cloud());
    }

    #[test]
    fn test_parse_file_url() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("file://{}", temp_dir.path().display());
        let dest = Uploader::parse(&url, "proj").unwrap();
        assert_eq!(dest.scheme(), "file");
    }

    #[test]
    fn test_from_config_local_keeps_prefix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_destination(temp_dir.path().display().to_string())
            .with_prefix("/raw/");
        let dest = Uploader::from_config(&config).unwrap();
        assert_eq!(dest.scheme(), "file");
        assert_eq!(dest.prefix(), "raw");
        assert_eq!(dest.object_key("a.csv").as_ref(), "raw/a.csv");
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let err = Uploader::parse("s3://bucket/raw", "proj").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_parse_gcs_missing_bucket() {
        let err = Uploader::parse("gs:///raw", "proj").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_gcs_invalid_project_header() {
        let err = Uploader::gcs("bucket", "raw", "bad\nproject").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_object_key() {
        let store = Arc::new(object_store::memory::InMemory::new());
        let dest = Uploader::from_store(store.clone(), "mem", "bucket", "/raw/");
        assert_eq!(dest.prefix(), "raw");
        assert_eq!(
            dest.object_key("products_20250101_000000.csv").as_ref(),
            "raw/products_20250101_000000.csv"
        );

        let dest = Uploader::from_store(store, "mem", "bucket", "");
        assert_eq!(dest.object_key("a.csv").as_ref(), "a.csv");
    }

    #[test]
    fn test_uri() {
        let store = Arc::new(object_store::memory::InMemory::new());
        let dest = Uploader::from_store(store, "gs", "ecomm-raw-data", "raw");
        let key = dest.object_key("products_20250101_000000.csv");
        assert_eq!(
            dest.uri(&key),
            "gs://ecomm-raw-data/raw/products_20250101_000000.csv"
        );
    }
}
