//! Domain entities representing core business objects.

pub mod employee;
pub mod organization;
pub mod retina;
pub mod statistics;
pub mod token;
pub mod user;
pub mod validation;

pub use employee::{Employee, EmployeeChanges};
pub use organization::{
    Organization, OrganizationCounts, OrganizationSummary, MAX_ORGANIZATION_NAME_LENGTH,
};
pub use retina::{
    EmployeeRetinaRef, ImageProcessingResult, RetinaImage, RetinaImageCommand, RetinaSummary,
    RetinaValidationCommand,
};
pub use statistics::{
    DailyStatistic, DailyStatistics, StatisticsFilter, TotalStatistics, ValidationRecord,
};
pub use token::{Claims, RefreshToken, TokenPair};
pub use user::{User, UserRole};
pub use validation::{message_id_of, ValidationOutcome, ValidationResponse};
