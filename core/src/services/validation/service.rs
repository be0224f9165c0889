//! Retina validation workflow.

use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::retina::RetinaValidationCommand;
use crate::domain::entities::statistics::ValidationRecord;
use crate::domain::entities::user::User;
use crate::domain::entities::validation::{message_id_of, ValidationOutcome, ValidationResponse};
use crate::errors::DomainError;
use crate::repositories::{RetinaImageRepository, ValidationStatisticsRepository};
use crate::services::access::ensure_organization_access;
use crate::services::storage::{BlobStorage, UploadedFile};

use super::correlator::ResponseCorrelator;
use super::MatchingGateway;

/// A validation request as received from a client
#[derive(Debug, Clone, Default)]
pub struct ValidationRequest {
    pub file: Option<UploadedFile>,
    pub organization_id: Option<Uuid>,
}

/// Uploads the presented image, asks the matching service for the closest
/// enrolled employee and records the outcome
pub struct ValidationService<R, B, M, S>
where
    R: RetinaImageRepository,
    B: BlobStorage,
    M: MatchingGateway,
    S: ValidationStatisticsRepository,
{
    retinas: Arc<R>,
    blobs: Arc<B>,
    matcher: Arc<M>,
    statistics: Arc<S>,
    correlator: Arc<ResponseCorrelator>,
    instance_id: Option<String>,
}

impl<R, B, M, S> ValidationService<R, B, M, S>
where
    R: RetinaImageRepository,
    B: BlobStorage,
    M: MatchingGateway,
    S: ValidationStatisticsRepository,
{
    pub fn new(
        retinas: Arc<R>,
        blobs: Arc<B>,
        matcher: Arc<M>,
        statistics: Arc<S>,
        correlator: Arc<ResponseCorrelator>,
        instance_id: Option<String>,
    ) -> Self {
        Self {
            retinas,
            blobs,
            matcher,
            statistics,
            correlator,
            instance_id,
        }
    }

    /// Runs one validation
    ///
    /// Client mistakes and timeouts come back as `status: "error"` bodies;
    /// `Err` is reserved for access violations and infrastructure failures.
    pub async fn validate(
        &self,
        actor: &User,
        request: ValidationRequest,
    ) -> Result<ValidationResponse, DomainError> {
        let Some(file) = request.file else {
            return Ok(ValidationResponse::error("No file uploaded"));
        };
        let Some(organization_id) = request.organization_id else {
            return Ok(ValidationResponse::error("Organization ID is required"));
        };
        ensure_organization_access(actor, organization_id)?;

        // Nothing is uploaded without candidates to compare against
        let employees = self.retinas.find_by_organization(organization_id).await?;
        if employees.is_empty() {
            return Ok(ValidationResponse::error(
                "No employees with retina images found for this organization",
            ));
        }

        let path = format!("validation/{}-{}", Uuid::new_v4(), file.file_name);
        let content_type = file.content_type().to_string();
        let stored = self.blobs.upload(&path, file.bytes, &content_type).await?;

        let message_id = Uuid::new_v4().to_string();
        let command = RetinaValidationCommand {
            image_path: stored.path.clone(),
            employees,
            message_id: message_id.clone(),
            originating_instance: self.instance_id.clone(),
        };

        let pending = self.correlator.register(message_id.clone()).await;
        tracing::info!(
            message_id = %message_id,
            organization_id = %organization_id,
            candidates = command.employees.len(),
            "Submitting retina validation"
        );

        match self.matcher.submit_validation(&command).await {
            Ok(Some(body)) if body.get("status").is_some() => {
                self.correlator
                    .deliver(&message_id, ValidationOutcome::from_body(&body))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                self.correlator.cancel(&message_id).await;
                tracing::error!(message_id = %message_id, error = %e, "Failed to submit validation");
                self.discard(&stored.path).await;
                return Err(e);
            }
        }

        let Some(outcome) = self.correlator.wait(pending).await else {
            return Ok(ValidationResponse::error(
                "Validation timed out. Please try again later.",
            ));
        };

        self.record(organization_id, &outcome).await;
        Ok(outcome.into())
    }

    /// Entry point for responses arriving through the callback endpoint
    ///
    /// The id from the `X-Message-Id` header wins over one in the body.
    pub async fn receive_response(&self, header_message_id: Option<&str>, body: &Value) -> bool {
        let message_id = header_message_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| message_id_of(body));

        let Some(message_id) = message_id else {
            tracing::warn!("Validation response without message id dropped");
            return false;
        };

        self.correlator
            .deliver(&message_id, ValidationOutcome::from_body(body))
            .await
    }

    /// Removes an uploaded image nobody will read
    async fn discard(&self, path: &str) {
        if let Err(e) = self.blobs.delete(path).await {
            tracing::warn!(path, error = %e, "Failed to remove validation image");
        }
    }

    async fn record(&self, organization_id: Uuid, outcome: &ValidationOutcome) {
        let employee_id = outcome
            .matching_employee_id
            .as_deref()
            .and_then(|id| Uuid::parse_str(id).ok());

        let record = match employee_id {
            Some(employee_id) if outcome.is_match() => {
                ValidationRecord::successful(organization_id, employee_id, outcome.similarity)
            }
            _ => ValidationRecord::failed(organization_id),
        };

        if let Err(e) = self.statistics.record(record).await {
            tracing::error!(error = %e, "Failed to record validation statistic");
        }
    }
}
