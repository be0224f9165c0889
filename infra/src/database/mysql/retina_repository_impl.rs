//! MySQL implementation of the RetinaImageRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use rv_core::domain::entities::retina::{EmployeeRetinaRef, RetinaImage};
use rv_core::errors::DomainError;
use rv_core::repositories::RetinaImageRepository;

use super::{column, query_error, uuid_column};

pub struct MySqlRetinaImageRepository {
    pool: MySqlPool,
}

impl MySqlRetinaImageRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_image(row: &MySqlRow) -> Result<RetinaImage, DomainError> {
        Ok(RetinaImage {
            id: uuid_column(row, "id")?,
            employee_id: uuid_column(row, "employee_id")?,
            path: column(row, "path")?,
            document_id: column(row, "document_id")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }
}

#[async_trait]
impl RetinaImageRepository for MySqlRetinaImageRepository {
    async fn create(&self, image: RetinaImage) -> Result<RetinaImage, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO retina_images (id, employee_id, path, document_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(image.id.to_string())
        .bind(image.employee_id.to_string())
        .bind(&image.path)
        .bind(image.document_id.as_deref())
        .bind(image.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("Failed to create retina image", e))?;

        Ok(image)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RetinaImage>, DomainError> {
        let row = sqlx::query(
            "SELECT id, employee_id, path, document_id, created_at FROM retina_images WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("Failed to find retina image", e))?;

        row.as_ref().map(Self::row_to_image).transpose()
    }

    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Vec<RetinaImage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, employee_id, path, document_id, created_at
            FROM retina_images
            WHERE employee_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(employee_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("Failed to list retina images", e))?;

        rows.iter().map(Self::row_to_image).collect()
    }

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<EmployeeRetinaRef>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.employee_id, r.document_id
            FROM retina_images r
            INNER JOIN employees e ON e.id = r.employee_id
            WHERE e.organization_id = ?
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(organization_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("Failed to list organization retinas", e))?;

        rows.iter()
            .map(|row| {
                let document_id: Option<String> = column(row, "document_id")?;
                Ok(EmployeeRetinaRef {
                    employee_id: uuid_column(row, "employee_id")?,
                    document_id: document_id.unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn set_document_id(&self, id: Uuid, document_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE retina_images SET document_id = ? WHERE id = ?")
            .bind(document_id)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to set retina document id", e))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // Unchanged rows report zero; existence decides the answer
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM retina_images WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete retina image", e))?;

        Ok(result.rows_affected() > 0)
    }
}
