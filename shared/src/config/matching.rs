//! External retina matching service configuration

use serde::{Deserialize, Serialize};

/// Settings for the HTTP gateway to the matching service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Base URL of the matching service
    pub base_url: String,

    /// Path receiving image processing commands
    #[serde(default = "default_processing_path")]
    pub processing_path: String,

    /// Path receiving validation commands
    #[serde(default = "default_validation_path")]
    pub validation_path: String,

    /// Timeout of a single HTTP call in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How long a validation request waits for its correlated response
    #[serde(default = "default_validation_timeout_ms")]
    pub validation_timeout_ms: u64,

    /// Shared key expected in `X-Callback-Key` on callback endpoints
    #[serde(default)]
    pub callback_key: Option<String>,

    /// Identifier of this API instance, echoed back by the matching service
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:8000"),
            processing_path: default_processing_path(),
            validation_path: default_validation_path(),
            request_timeout_ms: default_request_timeout_ms(),
            validation_timeout_ms: default_validation_timeout_ms(),
            callback_key: None,
            instance_id: None,
        }
    }
}

fn default_processing_path() -> String {
    String::from("/retina-processing")
}

fn default_validation_path() -> String {
    String::from("/retina-validation")
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_validation_timeout_ms() -> u64 {
    30_000
}
