//! In-memory validation statistics repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::statistics::{StatisticsFilter, ValidationRecord};
use crate::errors::DomainError;

use super::trait_::ValidationStatisticsRepository;

#[derive(Clone, Default)]
pub struct MockValidationStatisticsRepository {
    records: Arc<RwLock<Vec<ValidationRecord>>>,
}

impl MockValidationStatisticsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record
    pub async fn records(&self) -> Vec<ValidationRecord> {
        self.records.read().await.clone()
    }

    fn matches(record: &ValidationRecord, filter: &StatisticsFilter) -> bool {
        filter
            .organization_id
            .map_or(true, |org| record.organization_id == org)
            && filter
                .employee_id
                .map_or(true, |emp| record.employee_id == Some(emp))
    }
}

#[async_trait]
impl ValidationStatisticsRepository for MockValidationStatisticsRepository {
    async fn record(&self, record: ValidationRecord) -> Result<ValidationRecord, DomainError> {
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_in_range(
        &self,
        filter: StatisticsFilter,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ValidationRecord>, DomainError> {
        let records = self.records.read().await;
        let mut found: Vec<ValidationRecord> = records
            .iter()
            .filter(|r| Self::matches(r, &filter))
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(found)
    }

    async fn count(&self, filter: StatisticsFilter, successful: bool) -> Result<u64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_successful == successful && Self::matches(r, &filter))
            .count() as u64)
    }
}
