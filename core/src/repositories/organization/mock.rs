//! In-memory organization repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::organization::Organization;
use crate::errors::DomainError;

use super::trait_::OrganizationRepository;

#[derive(Clone, Default)]
pub struct MockOrganizationRepository {
    organizations: Arc<RwLock<HashMap<Uuid, Organization>>>,
}

impl MockOrganizationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationRepository for MockOrganizationRepository {
    async fn create(&self, organization: Organization) -> Result<Organization, DomainError> {
        let mut organizations = self.organizations.write().await;

        if organizations.values().any(|o| o.name == organization.name) {
            return Err(DomainError::conflict(
                "Organization with this name already exists",
            ));
        }

        organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError> {
        Ok(self.organizations.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, DomainError> {
        let organizations = self.organizations.read().await;
        Ok(organizations.values().find(|o| o.name == name).cloned())
    }

    async fn update(&self, organization: Organization) -> Result<Organization, DomainError> {
        let mut organizations = self.organizations.write().await;

        if !organizations.contains_key(&organization.id) {
            return Err(DomainError::not_found(format!(
                "Organization with ID {} not found",
                organization.id
            )));
        }

        organizations.insert(organization.id, organization.clone());
        Ok(organization)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.organizations.write().await.remove(&id).is_some())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Organization>, DomainError> {
        let organizations = self.organizations.read().await;
        let mut all: Vec<Organization> = organizations.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.organizations.read().await.len() as u64)
    }
}
