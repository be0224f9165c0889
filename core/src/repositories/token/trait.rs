//! Token repository trait for refresh token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence
///
/// Tokens are addressed by the SHA-256 hash of the refresh JWT; the raw token
/// is never stored.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by its hash
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Delete a single token by id
    ///
    /// # Returns
    /// * `Ok(true)` - Token deleted
    /// * `Ok(false)` - No such token
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every token of a user, returning how many were removed
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, DomainError>;
}
