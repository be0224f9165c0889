//! Organization scoping rules shared by the services.

use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Message of the 403 returned when a user reaches outside its organization
pub const ORGANIZATION_ACCESS_DENIED: &str =
    "You do not have permission to access resources for this organization";

/// Super admins reach every organization, everyone else only their own.
pub fn ensure_organization_access(user: &User, organization_id: Uuid) -> Result<(), DomainError> {
    if user.is_super_admin() || user.belongs_to(organization_id) {
        Ok(())
    } else {
        Err(DomainError::forbidden(ORGANIZATION_ACCESS_DENIED))
    }
}
