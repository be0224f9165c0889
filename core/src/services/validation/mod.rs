//! Retina validation against the external matching service.

pub mod correlator;
pub mod mock;
pub mod service;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::retina::{RetinaImageCommand, RetinaValidationCommand};
use crate::errors::DomainError;

pub use correlator::ResponseCorrelator;
pub use mock::MockMatchingGateway;
pub use service::{ValidationRequest, ValidationService};

/// Outbound channel to the retina matching service
#[async_trait]
pub trait MatchingGateway: Send + Sync {
    /// Asks the service to analyse a newly enrolled retina image
    async fn submit_image(&self, command: &RetinaImageCommand) -> Result<(), DomainError>;

    /// Submits a validation request
    ///
    /// # Returns
    /// * `Ok(Some(body))` - The service answered inline
    /// * `Ok(None)` - The answer will arrive through the callback endpoint
    async fn submit_validation(
        &self,
        command: &RetinaValidationCommand,
    ) -> Result<Option<Value>, DomainError>;
}
