//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::DomainError;

/// Optional filters for user listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
}

/// Repository trait for User entity persistence operations
///
/// Emails are unique; implementations report a duplicate through
/// `DomainError::Conflict`. Listings are ordered by creation time, newest first.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace an existing user
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No user with this id
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user; its refresh tokens go with it
    ///
    /// # Returns
    /// * `Ok(true)` - User deleted
    /// * `Ok(false)` - User not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// One page of users matching `filter`
    async fn list(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, DomainError>;

    /// Number of users matching `filter`
    async fn count(&self, filter: UserFilter) -> Result<u64, DomainError>;
}
