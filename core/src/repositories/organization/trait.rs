//! Organization repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::organization::Organization;
use crate::errors::DomainError;

/// Persistence of organizations; names are unique
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn create(&self, organization: Organization) -> Result<Organization, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError>;

    /// Exact name lookup, used for the uniqueness check
    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, DomainError>;

    async fn update(&self, organization: Organization) -> Result<Organization, DomainError>;

    /// Deletes the organization with its employees, retina records and
    /// statistics. Users stay and lose their membership.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// One page of organizations ordered by name
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Organization>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
