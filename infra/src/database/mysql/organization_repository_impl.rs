//! MySQL implementation of the OrganizationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use rv_core::domain::entities::organization::Organization;
use rv_core::errors::DomainError;
use rv_core::repositories::OrganizationRepository;

use super::{column, is_duplicate_key, query_error, uuid_column};

pub struct MySqlOrganizationRepository {
    pool: MySqlPool,
}

impl MySqlOrganizationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_organization(row: &MySqlRow) -> Result<Organization, DomainError> {
        Ok(Organization {
            id: uuid_column(row, "id")?,
            name: column(row, "name")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    fn map_write_error(context: &str, error: sqlx::Error) -> DomainError {
        if is_duplicate_key(&error) {
            DomainError::conflict("Organization with this name already exists")
        } else {
            query_error(context, error)
        }
    }
}

#[async_trait]
impl OrganizationRepository for MySqlOrganizationRepository {
    async fn create(&self, organization: Organization) -> Result<Organization, DomainError> {
        sqlx::query(
            "INSERT INTO organizations (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(organization.id.to_string())
        .bind(&organization.name)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error("Failed to create organization", e))?;

        tracing::info!(organization_id = %organization.id, "Created organization");
        Ok(organization)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM organizations WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to find organization", e))?;

        row.as_ref().map(Self::row_to_organization).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Organization>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM organizations WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to find organization", e))?;

        row.as_ref().map(Self::row_to_organization).transpose()
    }

    async fn update(&self, organization: Organization) -> Result<Organization, DomainError> {
        let result = sqlx::query("UPDATE organizations SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&organization.name)
            .bind(organization.updated_at)
            .bind(organization.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error("Failed to update organization", e))?;

        if result.rows_affected() == 0 && self.find_by_id(organization.id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Organization with ID {} not found",
                organization.id
            )));
        }

        Ok(organization)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete organization", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Organization>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM organizations
            ORDER BY name ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("Failed to list organizations", e))?;

        rows.iter().map(Self::row_to_organization).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("Failed to count organizations", e))?;

        Ok(count.max(0) as u64)
    }
}
