//! Business services containing domain logic and use cases.

pub mod access;
pub mod auth;
pub mod organization;
pub mod password;
pub mod recent_ids;
pub mod statistics;
pub mod storage;
pub mod token;
pub mod user;
pub mod validation;

// Re-export commonly used types
pub use access::ensure_organization_access;
pub use auth::{AuthService, AuthSession, Registration};
pub use organization::{
    NewEmployee, NewOrganizationUser, OrganizationService, OrganizationUserChanges,
};
pub use statistics::{DateRange, StatisticsService};
pub use storage::{
    content_type_for, BlobStorage, MockBlobStorage, RetinaService, StoredBlob, UploadedFile,
    UploadedRetina,
};
pub use token::{parse_expiration, TokenService, TokenServiceConfig};
pub use user::{NewUser, UserChanges, UserService};
pub use validation::{
    MatchingGateway, MockMatchingGateway, ResponseCorrelator, ValidationRequest,
    ValidationService,
};
