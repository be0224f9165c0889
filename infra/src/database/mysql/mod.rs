//! MySQL repository implementations
//!
//! UUIDs are stored as `CHAR(36)` strings and timestamps as `DATETIME(3)` in UTC.

mod employee_repository_impl;
mod organization_repository_impl;
mod retina_repository_impl;
mod statistics_repository_impl;
mod token_repository_impl;
mod user_repository_impl;

pub use employee_repository_impl::MySqlEmployeeRepository;
pub use organization_repository_impl::MySqlOrganizationRepository;
pub use retina_repository_impl::MySqlRetinaImageRepository;
pub use statistics_repository_impl::MySqlValidationStatisticsRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

use rv_core::errors::DomainError;

/// Read a column, reporting failures as internal errors
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| DomainError::internal(format!("Failed to get {}: {}", name, e)))
}

/// Read a `CHAR(36)` column as a UUID
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw)
        .map_err(|e| DomainError::internal(format!("Invalid UUID in {}: {}", name, e)))
}

/// Read a nullable `CHAR(36)` column as a UUID
pub(crate) fn optional_uuid_column(row: &MySqlRow, name: &str) -> Result<Option<Uuid>, DomainError> {
    let raw: Option<String> = column(row, name)?;
    raw.map(|value| {
        Uuid::parse_str(&value)
            .map_err(|e| DomainError::internal(format!("Invalid UUID in {}: {}", name, e)))
    })
    .transpose()
}

/// Map a query failure, logging the underlying cause
pub(crate) fn query_error(context: &str, error: sqlx::Error) -> DomainError {
    tracing::error!(error = %error, "{}", context);
    DomainError::internal(format!("{}: {}", context, error))
}

/// True when the error is a unique key violation
pub(crate) fn is_duplicate_key(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
