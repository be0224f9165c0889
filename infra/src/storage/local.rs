//! Filesystem blob storage
//!
//! Blobs are written below `{root}/{container}` using their slash-separated
//! path, and exposed under `{public_base_url}/{path}`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use rv_core::errors::DomainError;
use rv_core::services::{BlobStorage, StoredBlob};
use rv_shared::config::StorageConfig;

/// Blob store backed by a local directory
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    base_dir: PathBuf,
    public_base_url: String,
}

impl LocalBlobStorage {
    pub fn new(root: impl Into<PathBuf>, container: &str, public_base_url: impl Into<String>) -> Self {
        Self {
            base_dir: root.into().join(container),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.root, &config.container, config.public_base_url.clone())
    }

    /// Directory holding the container's blobs
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a blob path, refusing anything that could leave the container
    fn resolve(&self, path: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && !path.contains('\\')
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !is_plain {
            tracing::warn!(path, "Rejected blob path");
            return Err(DomainError::validation("Invalid image path"));
        }
        Ok(self.base_dir.join(relative))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

fn io_error(context: &str, error: std::io::Error) -> DomainError {
    tracing::error!(error = %error, "{}", context);
    DomainError::internal(format!("{}: {}", context, error))
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, DomainError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("Failed to create blob directory", e))?;
        }

        let size = bytes.len();
        fs::write(&target, bytes)
            .await
            .map_err(|e| io_error("Failed to write blob", e))?;

        tracing::debug!(path, size, content_type, "Stored blob");
        Ok(StoredBlob {
            path: path.to_string(),
            url: self.public_url(path),
        })
    }

    async fn download(&self, path: &str) -> Result<Option<Vec<u8>>, DomainError> {
        let target = self.resolve(path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("Failed to read blob", e)),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, DomainError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("Failed to delete blob", e)),
        }
    }
}
