use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rv_core::domain::{User, UserRole};
use rv_core::services::{NewUser, UserChanges};
use rv_shared::types::{PageMeta, Pagination};

use super::PaginationQuery;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: String,

    #[validate(email(message = "email must be an email"))]
    pub email: String,

    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: String,

    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
            organization_id: request.organization_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "firstName should not be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, message = "lastName should not be empty"))]
    pub last_name: Option<String>,

    #[validate(email(message = "email must be an email"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "password must be longer than or equal to 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
            organization_id: request.organization_id,
        }
    }
}

/// `GET /users` query
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,

    pub role: Option<UserRole>,
}

impl ListUsersQuery {
    pub fn pagination(&self) -> Pagination {
        PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
        .pagination()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmailQuery {
    #[validate(email(message = "email must be an email"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub meta: PageMeta,
}
