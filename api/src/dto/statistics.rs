use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use rv_core::services::DateRange;

use crate::handlers::ApiError;

/// `GET /statistics/daily` query; dates are `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatisticsQuery {
    pub organization_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DailyStatisticsQuery {
    pub fn range(&self) -> Result<DateRange, ApiError> {
        DateRange::new(self.start_date, self.end_date)
            .map_err(|e| ApiError::Validation(vec![format!("startDate: {}", e)]))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStatisticsQuery {
    pub organization_id: Option<Uuid>,
}
