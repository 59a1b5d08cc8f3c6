//! Storage module - image upload backends
//!
//! Local disk for vendor cover images (served under `/images`) and
//! S3-compatible object storage (AWS S3, MinIO, etc.) for the generic upload
//! endpoint.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Region},
    primitives::ByteStream,
    Client,
};
use chrono::{SecondsFormat, Utc};
use foodhub_application::{ApplicationResult, ImageStore, ImageUpload, StoredImage};
use foodhub_common::{RemoteStorageProvider, S3Config, StorageConfig};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::{Error, Result};

/// Attempts at finding a free file name before giving up
const MAX_NAME_ATTEMPTS: u32 = 16;

/// `<ISO-8601 timestamp>_<sanitized base name>`
pub fn timestamped_name(original: &str) -> String {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    format!("{}_{}", stamp, sanitize_file_name(original))
}

/// Keep the final path component and replace anything outside
/// `[A-Za-z0-9._-]` with `_`
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Images written to a directory on local disk
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    /// Use `root`, creating it when missing
    #[instrument]
    pub async fn new(root: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| Error::Storage(format!("cannot create {}: {}", root.display(), e)))?;
        info!(dir = %root.display(), "Local image storage ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write_new(&self, image: &ImageUpload) -> Result<String> {
        let base = timestamped_name(image.base_name());
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{}-{}", attempt, base)
            };
            let path = self.root.join(&name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&image.bytes)
                        .await
                        .map_err(|e| Error::Storage(e.to_string()))?;
                    file.flush()
                        .await
                        .map_err(|e| Error::Storage(e.to_string()))?;
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::Storage(e.to_string())),
            }
        }
        Err(Error::Storage(format!("no free file name for {}", base)))
    }
}

#[async_trait]
impl ImageStore for LocalDiskStorage {
    fn backend(&self) -> &'static str {
        "local"
    }

    #[instrument(skip(self, image), fields(file = %image.base_name(), size = image.bytes.len()))]
    async fn store(&self, image: &ImageUpload) -> ApplicationResult<StoredImage> {
        let name = self.write_new(image).await?;
        debug!(name = %name, "Image written to disk");
        Ok(StoredImage { reference: name })
    }
}

/// Images uploaded to an S3-compatible bucket
#[derive(Clone)]
pub struct S3ImageStorage {
    client: Client,
    bucket: String,
    path_prefix: String,
    public_base_url: String,
}

impl S3ImageStorage {
    /// Build a client from the default AWS credential chain
    #[instrument(skip(config), fields(bucket = %config.bucket, region = %config.region))]
    pub async fn new(config: &S3Config) -> Result<Self> {
        info!("Initializing S3 image storage");

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        Ok(Self::with_client(Client::from_conf(builder.build()), config))
    }

    /// Use an already configured client
    pub fn with_client(client: Client, config: &S3Config) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            path_prefix: config.path_prefix.trim_matches('/').to_string(),
            public_base_url: public_base_url(config),
        }
    }

    fn object_key(&self, name: &str) -> String {
        if self.path_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path_prefix, name)
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

/// Where objects of the bucket can be fetched from
fn public_base_url(config: &S3Config) -> String {
    if let Some(url) = &config.public_base_url {
        return url.trim_end_matches('/').to_string();
    }
    match &config.endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            config.bucket, config.region
        ),
    }
}

impl std::fmt::Debug for S3ImageStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ImageStorage")
            .field("bucket", &self.bucket)
            .field("path_prefix", &self.path_prefix)
            .finish()
    }
}

#[async_trait]
impl ImageStore for S3ImageStorage {
    fn backend(&self) -> &'static str {
        "s3"
    }

    #[instrument(skip(self, image), fields(file = %image.base_name(), size = image.bytes.len()))]
    async fn store(&self, image: &ImageUpload) -> ApplicationResult<StoredImage> {
        let key = self.object_key(&timestamped_name(image.base_name()));

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(image.bytes.clone()));
        if let Some(ct) = &image.content_type {
            request = request.content_type(ct);
        }
        request
            .send()
            .await
            .map_err(|e| Error::Storage(format!("upload of {} failed: {}", key, e)))?;

        debug!(key = %key, "Object uploaded");
        Ok(StoredImage {
            reference: self.object_url(&key),
        })
    }
}

/// The backend the upload endpoint writes to
pub async fn image_store_from_config(config: &StorageConfig) -> Result<Arc<dyn ImageStore>> {
    match config.remote_provider {
        RemoteStorageProvider::Local => Ok(Arc::new(LocalDiskStorage::new(&config.images_dir).await?)),
        RemoteStorageProvider::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                Error::Configuration("storage.s3 is required for the s3 provider".to_string())
            })?;
            Ok(Arc::new(S3ImageStorage::new(s3).await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s3_config() -> S3Config {
        S3Config {
            bucket: "foodhub".to_string(),
            region: "ap-south-1".to_string(),
            endpoint: None,
            path_prefix: "uploads".to_string(),
            public_base_url: None,
            force_path_style: false,
        }
    }

    #[test]
    fn test_sanitize_keeps_only_the_base_name() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\tmp\\My Photo.PNG"), "My_Photo.PNG");
        assert_eq!(sanitize_file_name(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn test_timestamped_name_shape() {
        let name = timestamped_name("dosa.jpg");
        let (stamp, rest) = name.split_once('_').unwrap();
        assert_eq!(rest, "dosa.jpg");
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn test_public_url_defaults_to_virtual_hosted_style() {
        assert_eq!(
            public_base_url(&s3_config()),
            "https://foodhub.s3.ap-south-1.amazonaws.com"
        );

        let custom = S3Config {
            endpoint: Some("http://minio:9000/".to_string()),
            ..s3_config()
        };
        assert_eq!(public_base_url(&custom), "http://minio:9000/foodhub");

        let cdn = S3Config {
            public_base_url: Some("https://cdn.example.com/".to_string()),
            ..s3_config()
        };
        assert_eq!(public_base_url(&cdn), "https://cdn.example.com");
    }
}
