//! Blob storage abstraction and the retina image workflow built on it.

pub mod mock;
pub mod service;

use async_trait::async_trait;

use crate::errors::DomainError;

pub use mock::MockBlobStorage;
pub use service::{RetinaService, UploadedRetina};

/// Location of a stored blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Path inside the container, e.g. `uploads/<uuid>.png`
    pub path: String,
    /// Public URL of the blob
    pub url: String,
}

/// File received from a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Extension of the original name including the dot, or empty
    pub fn extension(&self) -> &str {
        file_extension(&self.file_name)
    }

    pub fn content_type(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or_else(|| content_type_for(&self.file_name))
    }
}

/// Blob store holding image bytes under slash-separated paths
#[async_trait]
pub trait BlobStorage: Send + Sync {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, DomainError>;

    /// Blob contents, `None` when nothing is stored at `path`
    async fn download(&self, path: &str) -> Result<Option<Vec<u8>>, DomainError>;

    /// Returns `false` when nothing was stored at `path`
    async fn delete(&self, path: &str) -> Result<bool, DomainError>;
}

/// Content type served for a stored image, chosen by extension
pub fn content_type_for(name: &str) -> &'static str {
    match file_extension(name).to_ascii_lowercase().as_str() {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".bmp" => "image/bmp",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Extension of the last path segment including the dot
///
/// Names without a dot, or whose only dot is leading (`.env`), have none.
pub fn file_extension(name: &str) -> &str {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[idx..],
        _ => "",
    }
}
