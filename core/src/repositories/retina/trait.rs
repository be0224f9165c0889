//! Retina image repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::retina::{EmployeeRetinaRef, RetinaImage};
use crate::errors::DomainError;

/// Persistence of retina image records; the bytes live in blob storage
#[async_trait]
pub trait RetinaImageRepository: Send + Sync {
    async fn create(&self, image: RetinaImage) -> Result<RetinaImage, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RetinaImage>, DomainError>;

    /// Retina images of one employee, newest first
    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Vec<RetinaImage>, DomainError>;

    /// Every retina of the organization's employees, as sent to the
    /// matching service. Records without a document id carry an empty one.
    async fn find_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<EmployeeRetinaRef>, DomainError>;

    /// Attaches the document id assigned by the analysis service
    ///
    /// # Returns
    /// * `Ok(false)` - No record with this id
    async fn set_document_id(&self, id: Uuid, document_id: &str) -> Result<bool, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
