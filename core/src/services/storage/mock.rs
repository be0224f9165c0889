//! In-memory blob storage

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::{BlobStorage, StoredBlob};

const MOCK_BASE_URL: &str = "http://localhost/storage/images";

#[derive(Clone, Default)]
pub struct MockBlobStorage {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MockBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths currently stored, sorted
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStorage for MockBlobStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredBlob, DomainError> {
        self.blobs.write().await.insert(path.to_string(), bytes);
        Ok(StoredBlob {
            path: path.to_string(),
            url: format!("{}/{}", MOCK_BASE_URL, path),
        })
    }

    async fn download(&self, path: &str) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.blobs.read().await.get(path).cloned())
    }

    async fn delete(&self, path: &str) -> Result<bool, DomainError> {
        Ok(self.blobs.write().await.remove(path).is_some())
    }
}
