//! User administration.

use std::sync::Arc;
use uuid::Uuid;

use rv_shared::types::{PageMeta, Pagination};

use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{UserFilter, UserRepository};
use crate::services::password::hash_password;

/// Fields of a user created by an administrator
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `VALIDATOR`
    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
}

/// Partial update of a user; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub organization_id: Option<Uuid>,
}

pub struct UserService<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists.into());
        }

        let mut user = User::new(
            new_user.first_name,
            new_user.last_name,
            new_user.email,
            hash_password(&new_user.password)?,
            new_user.role.unwrap_or(UserRole::Validator),
        );
        user.organization_id = new_user.organization_id;

        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    /// One page of users, optionally restricted to a role
    pub async fn list(
        &self,
        pagination: Pagination,
        role: Option<UserRole>,
    ) -> Result<(Vec<User>, PageMeta), DomainError> {
        let pagination = pagination.normalized();
        let filter = UserFilter {
            role,
            ..Default::default()
        };

        let users = self
            .users
            .list(filter, pagination.offset(), pagination.limit_u64())
            .await?;
        let total = self.users.count(filter).await?;

        Ok((users, pagination.meta(total)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User with ID {} not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.users.find_by_email(email).await?.ok_or_else(|| {
            DomainError::not_found(format!("User with email {} not found", email))
        })
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, DomainError> {
        let mut user = self.find_by_id(id).await?;

        if let Some(email) = changes.email {
            if email != user.email {
                if let Some(owner) = self.users.find_by_email(&email).await? {
                    if owner.id != id {
                        return Err(AuthError::EmailAlreadyExists.into());
                    }
                }
                user.email = email;
            }
        }
        if let Some(password) = changes.password {
            user.password_hash = hash_password(&password)?;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(organization_id) = changes.organization_id {
            user.organization_id = Some(organization_id);
        }
        user.touch();

        self.users.update(user).await
    }

    /// Deletes a user and returns it as it was
    pub async fn delete(&self, id: Uuid) -> Result<User, DomainError> {
        let user = self.find_by_id(id).await?;
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(user)
    }
}
