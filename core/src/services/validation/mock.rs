//! Scriptable matching gateway for tests

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::retina::{RetinaImageCommand, RetinaValidationCommand};
use crate::errors::DomainError;

use super::MatchingGateway;

/// Records every command; validation replies are scripted
#[derive(Clone, Default)]
pub struct MockMatchingGateway {
    images: Arc<RwLock<Vec<RetinaImageCommand>>>,
    validations: Arc<RwLock<Vec<RetinaValidationCommand>>>,
    inline_reply: Arc<RwLock<Option<Value>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockMatchingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body returned inline for every following validation request
    pub async fn reply_with(&self, body: Value) {
        *self.inline_reply.write().await = Some(body);
    }

    /// Makes every following submission fail
    pub async fn fail(&self) {
        *self.failing.write().await = true;
    }

    pub async fn image_commands(&self) -> Vec<RetinaImageCommand> {
        self.images.read().await.clone()
    }

    pub async fn validation_commands(&self) -> Vec<RetinaValidationCommand> {
        self.validations.read().await.clone()
    }

    async fn check_failing(&self) -> Result<(), DomainError> {
        if *self.failing.read().await {
            return Err(DomainError::internal("matching service unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MatchingGateway for MockMatchingGateway {
    async fn submit_image(&self, command: &RetinaImageCommand) -> Result<(), DomainError> {
        self.check_failing().await?;
        self.images.write().await.push(command.clone());
        Ok(())
    }

    async fn submit_validation(
        &self,
        command: &RetinaValidationCommand,
    ) -> Result<Option<Value>, DomainError> {
        self.check_failing().await?;
        self.validations.write().await.push(command.clone());
        Ok(self.inline_reply.read().await.clone())
    }
}
