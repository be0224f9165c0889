//! In-memory implementation of UserRepository for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::trait_::{UserFilter, UserRepository};

/// Mock user repository for testing
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        filter.role.map_or(true, |role| user.role == role)
            && filter
                .organization_id
                .map_or(true, |org| user.organization_id == Some(org))
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::conflict("Email already exists"));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::not_found(format!("User with ID {} not found", user.id)));
        }
        if users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(DomainError::conflict("Email already exists"));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users
            .values()
            .filter(|u| Self::matches(u, &filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: UserFilter) -> Result<u64, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| Self::matches(u, &filter)).count() as u64)
    }
}
