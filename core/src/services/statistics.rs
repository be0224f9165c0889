//! Validation statistics queries.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::statistics::{
    DailyStatistic, DailyStatistics, StatisticsFilter, TotalStatistics,
};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::ValidationStatisticsRepository;
use crate::services::access::{ensure_organization_access, ORGANIZATION_ACCESS_DENIED};

/// Longest daily statistics query, in days
pub const MAX_RANGE_DAYS: i64 = 1_830;

/// Inclusive date range of a daily statistics query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange);
        }
        if (end - start).num_days() >= MAX_RANGE_DAYS {
            return Err(ValidationError::DateRangeTooLong {
                max_days: MAX_RANGE_DAYS,
            });
        }
        Ok(Self { start, end })
    }

    /// Every date of the range in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start
            .iter_days()
            .take_while(move |day| *day <= self.end)
    }
}

pub struct StatisticsService<S: ValidationStatisticsRepository> {
    statistics: Arc<S>,
}

impl<S: ValidationStatisticsRepository> StatisticsService<S> {
    pub fn new(statistics: Arc<S>) -> Self {
        Self { statistics }
    }

    /// Organization a query runs against on behalf of `actor`
    ///
    /// Organization admins default to, and are limited to, their own.
    pub fn scope(&self, actor: &User, requested: Option<Uuid>) -> Result<Option<Uuid>, DomainError> {
        match (actor.role, requested) {
            (UserRole::SuperAdmin, requested) => Ok(requested),
            (_, Some(organization_id)) => {
                ensure_organization_access(actor, organization_id)?;
                Ok(Some(organization_id))
            }
            (_, None) => actor
                .organization_id
                .map(Some)
                .ok_or_else(|| DomainError::forbidden(ORGANIZATION_ACCESS_DENIED)),
        }
    }

    /// Per-day success and failure counts; days without data appear with zeros
    pub async fn daily(
        &self,
        actor: &User,
        organization_id: Option<Uuid>,
        employee_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<DailyStatistics, DomainError> {
        let organization_id = self.scope(actor, organization_id)?;

        let start = Utc.from_utc_datetime(&range.start.and_time(NaiveTime::MIN));
        let end_time = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| DomainError::internal("invalid end of day"))?;
        let end = Utc.from_utc_datetime(&range.end.and_time(end_time));

        let filter = StatisticsFilter {
            organization_id,
            employee_id,
        };
        let records = self.statistics.find_in_range(filter, start, end).await?;

        let mut days: BTreeMap<NaiveDate, (u64, u64)> =
            range.days().map(|day| (day, (0, 0))).collect();
        for record in records {
            let counts = days.entry(record.timestamp.date_naive()).or_default();
            if record.is_successful {
                counts.0 += 1;
            } else {
                counts.1 += 1;
            }
        }

        Ok(DailyStatistics {
            organization_id,
            daily_stats: days
                .into_iter()
                .map(|(date, (success_count, failure_count))| DailyStatistic {
                    date,
                    success_count,
                    failure_count,
                })
                .collect(),
        })
    }

    /// Totals with the success rate in percent, rounded to two decimals
    pub async fn total(
        &self,
        actor: &User,
        organization_id: Option<Uuid>,
    ) -> Result<TotalStatistics, DomainError> {
        let organization_id = self.scope(actor, organization_id)?;
        let filter = StatisticsFilter {
            organization_id,
            employee_id: None,
        };

        let total_success_count = self.statistics.count(filter, true).await?;
        let total_failure_count = self.statistics.count(filter, false).await?;
        let total_count = total_success_count + total_failure_count;

        Ok(TotalStatistics {
            organization_id,
            total_success_count,
            total_failure_count,
            total_count,
            success_rate: success_rate(total_success_count, total_count),
        })
    }
}

fn success_rate(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = successes as f64 * 100.0 / total as f64;
    (rate * 100.0).round() / 100.0
}
