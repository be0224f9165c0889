//! In-memory retina image repository

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::retina::{EmployeeRetinaRef, RetinaImage};
use crate::errors::DomainError;
use crate::repositories::employee::{EmployeeRepository, MockEmployeeRepository};

use super::trait_::RetinaImageRepository;

/// Mock retina repository
///
/// Organization lookups go through the employee repository it was built
/// with, standing in for the SQL join.
#[derive(Clone, Default)]
pub struct MockRetinaImageRepository {
    images: Arc<RwLock<HashMap<Uuid, RetinaImage>>>,
    employees: MockEmployeeRepository,
}

impl MockRetinaImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares employee state with an existing mock employee repository
    pub fn with_employees(employees: MockEmployeeRepository) -> Self {
        Self {
            images: Arc::default(),
            employees,
        }
    }
}

#[async_trait]
impl RetinaImageRepository for MockRetinaImageRepository {
    async fn create(&self, image: RetinaImage) -> Result<RetinaImage, DomainError> {
        self.images.write().await.insert(image.id, image.clone());
        Ok(image)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RetinaImage>, DomainError> {
        Ok(self.images.read().await.get(&id).cloned())
    }

    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Vec<RetinaImage>, DomainError> {
        let images = self.images.read().await;
        let mut found: Vec<RetinaImage> = images
            .values()
            .filter(|i| i.employee_id == employee_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<EmployeeRetinaRef>, DomainError> {
        let members: HashSet<Uuid> = self
            .employees
            .list_by_organization(organization_id)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        let images = self.images.read().await;

        Ok(images
            .values()
            .filter(|i| members.contains(&i.employee_id))
            .map(|i| EmployeeRetinaRef {
                employee_id: i.employee_id,
                document_id: i.document_id.clone().unwrap_or_default(),
            })
            .collect())
    }

    async fn set_document_id(&self, id: Uuid, document_id: &str) -> Result<bool, DomainError> {
        let mut images = self.images.write().await;
        match images.get_mut(&id) {
            Some(image) => {
                image.document_id = Some(document_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.images.write().await.remove(&id).is_some())
    }
}
