//! Image upload policy and storage.

use foodhub_common::StorageConfig;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::ports::{ImageStore, ImageUpload, StoredImage};
use crate::{ApplicationError, ApplicationResult};

/// Maximum number of files in one multipart request
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Constraints every upload must satisfy before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    allowed_formats: Vec<String>,
    max_bytes: usize,
}

impl UploadPolicy {
    pub fn new(allowed_formats: Vec<String>, max_bytes: usize) -> Self {
        Self {
            allowed_formats: allowed_formats
                .into_iter()
                .map(|f| f.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.allowed_formats.clone(), config.max_upload_bytes)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check(&self, image: &ImageUpload) -> ApplicationResult<()> {
        if image.bytes.is_empty() {
            return Err(ApplicationError::InvalidInput(format!(
                "Uploaded file '{}' is empty",
                image.base_name()
            )));
        }

        match image.extension() {
            Some(ext) if self.allowed_formats.contains(&ext) => {}
            _ => {
                return Err(ApplicationError::InvalidInput(format!(
                    "Unsupported image format for '{}'; allowed: {}",
                    image.base_name(),
                    self.allowed_formats.join(", ")
                )))
            }
        }

        if image.bytes.len() > self.max_bytes {
            return Err(ApplicationError::PayloadTooLarge(format!(
                "'{}' is {} bytes; the limit is {} bytes",
                image.base_name(),
                image.bytes.len(),
                self.max_bytes
            )));
        }

        Ok(())
    }
}

/// Validates uploads against a policy and hands them to one storage backend
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
    policy: UploadPolicy,
}

impl ImageService {
    pub fn new(store: Arc<dyn ImageStore>, policy: UploadPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    #[instrument(skip(self, image), fields(file = %image.base_name(), backend = self.store.backend()))]
    pub async fn upload(&self, image: &ImageUpload) -> ApplicationResult<StoredImage> {
        self.policy.check(image)?;
        let stored = self.store.store(image).await?;
        info!(reference = %stored.reference, "image stored");
        Ok(stored)
    }

    /// Store a batch. Every file is checked before any is written.
    pub async fn upload_many(&self, images: &[ImageUpload]) -> ApplicationResult<Vec<StoredImage>> {
        if images.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "No image file uploaded".to_string(),
            ));
        }
        if images.len() > MAX_FILES_PER_REQUEST {
            return Err(ApplicationError::InvalidInput(format!(
                "At most {} images can be uploaded at once",
                MAX_FILES_PER_REQUEST
            )));
        }
        for image in images {
            self.policy.check(image)?;
        }

        let mut stored = Vec::with_capacity(images.len());
        for image in images {
            stored.push(self.store.store(image).await?);
        }
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn policy() -> UploadPolicy {
        UploadPolicy::new(
            vec!["jpg".into(), "png".into(), ".JPEG".into(), "gif".into()],
            16,
        )
    }

    fn image(name: &str, size: usize) -> ImageUpload {
        ImageUpload::new(name, None, Bytes::from(vec![0u8; size]))
    }

    #[test]
    fn test_allowed_formats_are_accepted() {
        let p = policy();
        assert!(p.check(&image("a.jpg", 4)).is_ok());
        assert!(p.check(&image("a.PNG", 4)).is_ok());
        assert!(p.check(&image("a.jpeg", 4)).is_ok());
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let err = policy().check(&image("a.exe", 4)).unwrap_err();
        assert_eq!(err.http_status(), 400);
        let err = policy().check(&image("noext", 4)).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn test_size_cap() {
        assert!(policy().check(&image("a.gif", 16)).is_ok());
        let err = policy().check(&image("a.gif", 17)).unwrap_err();
        assert_eq!(err.http_status(), 413);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        assert!(policy().check(&image("a.gif", 0)).is_err());
    }
}
