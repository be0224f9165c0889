//! Blob storage configuration

use serde::{Deserialize, Serialize};

/// Blob storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Root directory of the filesystem store
    pub root: String,

    /// Container name; blobs live under `{root}/{container}`
    pub container: String,

    /// Base URL used when building public blob URLs
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: String::from("./data/blobs"),
            container: String::from("retinas"),
            public_base_url: String::from("http://localhost:3000/storage/images"),
        }
    }
}
