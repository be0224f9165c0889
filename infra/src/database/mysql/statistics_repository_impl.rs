//! MySQL implementation of the ValidationStatisticsRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use rv_core::domain::entities::statistics::{StatisticsFilter, ValidationRecord};
use rv_core::errors::DomainError;
use rv_core::repositories::ValidationStatisticsRepository;

use super::{column, optional_uuid_column, query_error, uuid_column};

pub struct MySqlValidationStatisticsRepository {
    pool: MySqlPool,
}

impl MySqlValidationStatisticsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &MySqlRow) -> Result<ValidationRecord, DomainError> {
        Ok(ValidationRecord {
            id: uuid_column(row, "id")?,
            organization_id: uuid_column(row, "organization_id")?,
            employee_id: optional_uuid_column(row, "employee_id")?,
            timestamp: column::<DateTime<Utc>>(row, "timestamp")?,
            is_successful: column(row, "is_successful")?,
            similarity: column(row, "similarity")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: StatisticsFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(organization_id) = filter.organization_id {
            builder
                .push(" AND organization_id = ")
                .push_bind(organization_id.to_string());
        }
        if let Some(employee_id) = filter.employee_id {
            builder
                .push(" AND employee_id = ")
                .push_bind(employee_id.to_string());
        }
    }
}

#[async_trait]
impl ValidationStatisticsRepository for MySqlValidationStatisticsRepository {
    async fn record(&self, record: ValidationRecord) -> Result<ValidationRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO validation_statistics
                (id, organization_id, employee_id, timestamp, is_successful, similarity)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.organization_id.to_string())
        .bind(record.employee_id.map(|id| id.to_string()))
        .bind(record.timestamp)
        .bind(record.is_successful)
        .bind(record.similarity)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("Failed to record validation", e))?;

        tracing::debug!(
            organization_id = %record.organization_id,
            successful = record.is_successful,
            "Recorded validation"
        );
        Ok(record)
    }

    async fn find_in_range(
        &self,
        filter: StatisticsFilter,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ValidationRecord>, DomainError> {
        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT id, organization_id, employee_id, timestamp, is_successful, similarity \
             FROM validation_statistics",
        );
        Self::push_filter(&mut builder, filter);
        builder
            .push(" AND timestamp >= ")
            .push_bind(start)
            .push(" AND timestamp <= ")
            .push_bind(end)
            .push(" ORDER BY timestamp ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to query validation statistics", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn count(&self, filter: StatisticsFilter, successful: bool) -> Result<u64, DomainError> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM validation_statistics");
        Self::push_filter(&mut builder, filter);
        builder.push(" AND is_successful = ").push_bind(successful);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("Failed to count validation statistics", e))?;

        Ok(count.max(0) as u64)
    }
}
