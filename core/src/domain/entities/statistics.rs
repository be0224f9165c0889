//! Validation outcomes and the aggregates computed from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded retina validation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Matched employee, successful attempts only
    pub employee_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub is_successful: bool,
    pub similarity: Option<f64>,
}

impl ValidationRecord {
    pub fn successful(organization_id: Uuid, employee_id: Uuid, similarity: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            employee_id: Some(employee_id),
            timestamp: Utc::now(),
            is_successful: true,
            similarity: Some(similarity),
        }
    }

    pub fn failed(organization_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id,
            employee_id: None,
            timestamp: Utc::now(),
            is_successful: false,
            similarity: None,
        }
    }
}

/// Counts for a single calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatistic {
    pub date: NaiveDate,
    pub success_count: u64,
    pub failure_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatistics {
    pub organization_id: Option<Uuid>,
    pub daily_stats: Vec<DailyStatistic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatistics {
    pub organization_id: Option<Uuid>,
    pub total_success_count: u64,
    pub total_failure_count: u64,
    pub total_count: u64,
    /// Percentage rounded to two decimals
    pub success_rate: f64,
}

/// Filter applied to statistic queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsFilter {
    pub organization_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}
