//! Validation statistics repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::statistics::{StatisticsFilter, ValidationRecord};
use crate::errors::DomainError;

#[async_trait]
pub trait ValidationStatisticsRepository: Send + Sync {
    async fn record(&self, record: ValidationRecord) -> Result<ValidationRecord, DomainError>;

    /// Records matching `filter` with `start <= timestamp <= end`
    async fn find_in_range(
        &self,
        filter: StatisticsFilter,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ValidationRecord>, DomainError>;

    /// Number of successful or failed records matching `filter`
    async fn count(&self, filter: StatisticsFilter, successful: bool) -> Result<u64, DomainError>;
}
