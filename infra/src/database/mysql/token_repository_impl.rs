//! MySQL implementation of the TokenRepository trait.
//!
//! Only the SHA-256 hash of a refresh token is stored; the raw JWT never
//! reaches the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use rv_core::domain::entities::token::RefreshToken;
use rv_core::errors::DomainError;
use rv_core::repositories::TokenRepository;

use super::{column, query_error, uuid_column};

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        Ok(RefreshToken {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            token_hash: column(row, "token_hash")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            expires_at: column::<DateTime<Utc>>(row, "expires_at")?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to save refresh token", e))?;

        tracing::debug!(user_id = %token.user_id, "Saved refresh token");
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM refresh_tokens
            WHERE token_hash = ?
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete user refresh tokens", e))?;

        let removed = result.rows_affected();
        tracing::info!(user_id = %user_id, removed, "Deleted all refresh tokens for user");
        Ok(removed)
    }
}
