//! Employee repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::employee::Employee;
use crate::errors::DomainError;

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, employee: Employee) -> Result<Employee, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DomainError>;

    /// Employees of an organization, newest first
    async fn list_by_organization(&self, organization_id: Uuid)
        -> Result<Vec<Employee>, DomainError>;

    async fn count_by_organization(&self, organization_id: Uuid) -> Result<u64, DomainError>;

    async fn update(&self, employee: Employee) -> Result<Employee, DomainError>;

    /// Deletes the employee and its retina records
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
