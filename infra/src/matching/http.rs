//! HTTP gateway to the retina matching service
//!
//! Image processing commands are fire-and-forget. Validation commands may be
//! answered inline (a JSON body carrying a `status`) or later through the
//! callback endpoint, in which case the service replies without such a body.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use rv_core::domain::entities::retina::{RetinaImageCommand, RetinaValidationCommand};
use rv_core::errors::DomainError;
use rv_core::services::MatchingGateway;
use rv_shared::config::MatchingConfig;

use crate::InfrastructureError;

/// reqwest based implementation of `MatchingGateway`
#[derive(Debug, Clone)]
pub struct HttpMatchingGateway {
    client: Client,
    processing_url: String,
    validation_url: String,
}

impl HttpMatchingGateway {
    pub fn new(config: &MatchingConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            client,
            processing_url: join_url(base, &config.processing_path),
            validation_url: join_url(base, &config.validation_path),
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, DomainError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, url, "Matching service request failed");
                DomainError::internal(format!("Matching service request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, url, "Matching service rejected request");
            return Err(DomainError::internal(format!(
                "Matching service returned {}",
                status
            )));
        }
        Ok(response)
    }
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// An inline answer is a JSON object carrying a `status` field
fn inline_reply(body: &[u8]) -> Option<Value> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("status").is_some().then_some(value)
}

#[async_trait]
impl MatchingGateway for HttpMatchingGateway {
    async fn submit_image(&self, command: &RetinaImageCommand) -> Result<(), DomainError> {
        self.post(&self.processing_url, command).await?;
        tracing::info!(img_id = %command.img_id, "Submitted retina image for processing");
        Ok(())
    }

    async fn submit_validation(
        &self,
        command: &RetinaValidationCommand,
    ) -> Result<Option<Value>, DomainError> {
        let response = self.post(&self.validation_url, command).await?;
        let body = response.bytes().await.map_err(|e| {
            DomainError::internal(format!("Failed to read matching service response: {}", e))
        })?;

        let reply = inline_reply(&body);
        tracing::debug!(
            message_id = %command.message_id,
            inline = reply.is_some(),
            "Submitted retina validation"
        );
        Ok(reply)
    }
}
