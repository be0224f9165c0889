//! Repository interfaces and their in-memory implementations.

pub mod employee;
pub mod organization;
pub mod retina;
pub mod statistics;
pub mod token;
pub mod user;

pub use employee::{EmployeeRepository, MockEmployeeRepository};
pub use organization::{MockOrganizationRepository, OrganizationRepository};
pub use retina::{MockRetinaImageRepository, RetinaImageRepository};
pub use statistics::{MockValidationStatisticsRepository, ValidationStatisticsRepository};
pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserRepository, UserFilter, UserRepository};
