use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use rv_core::domain::{EmployeeChanges, OrganizationSummary, User, UserRole};
use rv_core::services::{NewEmployee, NewOrganizationUser, OrganizationUserChanges};
use rv_shared::types::PageMeta;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationListResponse {
    pub organizations: Vec<OrganizationSummary>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationUsersResponse {
    pub users: Vec<User>,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddOrganizationUserRequest {
    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: String,

    pub role: Option<UserRole>,
}

impl From<AddOrganizationUserRequest> for NewOrganizationUser {
    fn from(request: AddOrganizationUserRequest) -> Self {
        Self {
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            password: request.password,
            role: request.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationUserRequest {
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UpdateOrganizationUserRequest> for OrganizationUserChanges {
    fn from(request: UpdateOrganizationUserRequest) -> Self {
        Self {
            role: request.role,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,

    /// `YYYY-MM-DD`
    pub birth_date: NaiveDate,

    #[validate(length(min = 1, message = "position should not be empty"))]
    pub position: String,
}

impl From<CreateEmployeeRequest> for NewEmployee {
    fn from(request: CreateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            birth_date: request.birth_date,
            position: request.position,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: Option<String>,

    pub birth_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "position should not be empty"))]
    pub position: Option<String>,
}

impl From<UpdateEmployeeRequest> for EmployeeChanges {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            birth_date: request.birth_date,
            position: request.position,
        }
    }
}
