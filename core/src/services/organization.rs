//! Organization, membership and employee management.

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use rv_shared::types::{PageMeta, Pagination};

use crate::domain::entities::employee::{Employee, EmployeeChanges};
use crate::domain::entities::organization::{
    Organization, OrganizationCounts, OrganizationSummary,
};
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{EmployeeRepository, OrganizationRepository, UserFilter, UserRepository};
use crate::services::password::hash_password;

const NOT_A_MEMBER: &str = "You are not a member of this organization";
const NO_EMPLOYEE_ACCESS: &str = "You do not have access to this employee";
const NAME_TAKEN: &str = "Organization with this name already exists";

/// Account created directly inside an organization
#[derive(Debug, Clone)]
pub struct NewOrganizationUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// Defaults to `ORG_ADMIN`
    pub role: Option<UserRole>,
}

/// Role change of an organization member, with optional renaming
#[derive(Debug, Clone)]
pub struct OrganizationUserChanges {
    pub role: UserRole,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
}

pub struct OrganizationService<O, U, E>
where
    O: OrganizationRepository,
    U: UserRepository,
    E: EmployeeRepository,
{
    organizations: Arc<O>,
    users: Arc<U>,
    employees: Arc<E>,
}

impl<O, U, E> OrganizationService<O, U, E>
where
    O: OrganizationRepository,
    U: UserRepository,
    E: EmployeeRepository,
{
    pub fn new(organizations: Arc<O>, users: Arc<U>, employees: Arc<E>) -> Self {
        Self {
            organizations,
            users,
            employees,
        }
    }

    pub async fn create(&self, name: String) -> Result<Organization, DomainError> {
        if self.organizations.find_by_name(&name).await?.is_some() {
            return Err(DomainError::conflict(NAME_TAKEN));
        }

        let organization = self.organizations.create(Organization::new(name)).await?;
        tracing::info!(organization_id = %organization.id, "Organization created");
        Ok(organization)
    }

    /// One page of organizations with their member counts
    pub async fn list(
        &self,
        pagination: Pagination,
    ) -> Result<(Vec<OrganizationSummary>, PageMeta), DomainError> {
        let pagination = pagination.normalized();
        let organizations = self
            .organizations
            .list(pagination.offset(), pagination.limit_u64())
            .await?;
        let total = self.organizations.count().await?;

        let mut summaries = Vec::with_capacity(organizations.len());
        for organization in organizations {
            let count = self.counts(organization.id).await?;
            summaries.push(OrganizationSummary {
                organization,
                count,
            });
        }

        Ok((summaries, pagination.meta(total)))
    }

    /// Organization lookup on behalf of `actor`
    pub async fn get(&self, actor: &User, id: Uuid) -> Result<Organization, DomainError> {
        Self::ensure_member(actor, id)?;
        self.find(id).await
    }

    pub async fn update(&self, id: Uuid, name: Option<String>) -> Result<Organization, DomainError> {
        let mut organization = self.find(id).await?;

        if let Some(name) = name {
            if name != organization.name {
                if self.organizations.find_by_name(&name).await?.is_some() {
                    return Err(DomainError::conflict(NAME_TAKEN));
                }
                organization.rename(name);
            }
        }

        self.organizations.update(organization).await
    }

    /// Deletes an organization and returns it as it was
    pub async fn delete(&self, id: Uuid) -> Result<Organization, DomainError> {
        let organization = self.find(id).await?;
        self.organizations.delete(id).await?;
        tracing::info!(organization_id = %id, "Organization deleted");
        Ok(organization)
    }

    /// Members of an organization with the total member count
    pub async fn list_users(
        &self,
        actor: &User,
        id: Uuid,
        pagination: Pagination,
    ) -> Result<(Vec<User>, u64), DomainError> {
        Self::ensure_member(actor, id)?;
        self.find(id).await?;

        let pagination = pagination.normalized();
        let filter = Self::members(id);
        let users = self
            .users
            .list(filter, pagination.offset(), pagination.limit_u64())
            .await?;
        let total = self.users.count(filter).await?;
        Ok((users, total))
    }

    /// Creates a user inside the organization
    pub async fn add_user(
        &self,
        actor: &User,
        id: Uuid,
        new_user: NewOrganizationUser,
    ) -> Result<Organization, DomainError> {
        Self::ensure_member(actor, id)?;
        let role = new_user.role.unwrap_or(UserRole::OrgAdmin);
        Self::ensure_assignable(actor, role)?;
        let organization = self.find(id).await?;

        if let Some(existing) = self.users.find_by_email(&new_user.email).await? {
            return Err(match existing.organization_id {
                Some(org) if org == id => {
                    DomainError::conflict("User already belongs to this organization")
                }
                Some(_) => DomainError::conflict("User already belongs to another organization"),
                None => AuthError::EmailAlreadyExists.into(),
            });
        }

        let user = User::new(
            new_user.first_name,
            new_user.last_name,
            new_user.email,
            hash_password(&new_user.password)?,
            role,
        )
        .with_organization(id);
        let user = self.users.create(user).await?;
        tracing::info!(organization_id = %id, user_id = %user.id, "User added to organization");

        Ok(organization)
    }

    pub async fn update_user(
        &self,
        actor: &User,
        id: Uuid,
        user_id: Uuid,
        changes: OrganizationUserChanges,
    ) -> Result<User, DomainError> {
        Self::ensure_member(actor, id)?;
        Self::ensure_assignable(actor, changes.role)?;
        let mut user = self.find_member(id, user_id).await?;
        Self::ensure_assignable(actor, user.role)?;

        user.role = changes.role;
        if let Some(first_name) = changes.first_name.filter(|s| !s.is_empty()) {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name.filter(|s| !s.is_empty()) {
            user.last_name = last_name;
        }
        user.touch();

        self.users.update(user).await
    }

    /// Deletes a member account
    pub async fn remove_user(&self, actor: &User, id: Uuid, user_id: Uuid) -> Result<User, DomainError> {
        Self::ensure_member(actor, id)?;
        let user = self.find_member(id, user_id).await?;
        self.users.delete(user_id).await?;
        tracing::info!(organization_id = %id, user_id = %user_id, "User removed from organization");
        Ok(user)
    }

    pub async fn create_employee(
        &self,
        actor: &User,
        id: Uuid,
        new_employee: NewEmployee,
    ) -> Result<Employee, DomainError> {
        Self::ensure_member(actor, id)?;
        self.find(id).await?;

        let employee = Employee::new(
            id,
            new_employee.first_name,
            new_employee.last_name,
            new_employee.birth_date,
            new_employee.position,
        );
        self.employees.create(employee).await
    }

    pub async fn list_employees(&self, actor: &User, id: Uuid) -> Result<Vec<Employee>, DomainError> {
        Self::ensure_member(actor, id)?;
        self.find(id).await?;
        self.employees.list_by_organization(id).await
    }

    pub async fn get_employee(&self, actor: &User, employee_id: Uuid) -> Result<Employee, DomainError> {
        let employee = self.find_employee(employee_id).await?;
        if !actor.is_super_admin() && !actor.belongs_to(employee.organization_id) {
            return Err(DomainError::not_found(NO_EMPLOYEE_ACCESS));
        }
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        actor: &User,
        employee_id: Uuid,
        changes: EmployeeChanges,
    ) -> Result<Employee, DomainError> {
        let mut employee = self.get_employee(actor, employee_id).await?;
        employee.apply(changes);
        self.employees.update(employee).await
    }

    pub async fn delete_employee(&self, actor: &User, employee_id: Uuid) -> Result<Employee, DomainError> {
        let employee = self.get_employee(actor, employee_id).await?;
        self.employees.delete(employee_id).await?;
        Ok(employee)
    }

    async fn find(&self, id: Uuid) -> Result<Organization, DomainError> {
        self.organizations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Organization with ID {} not found", id)))
    }

    async fn find_member(&self, id: Uuid, user_id: Uuid) -> Result<User, DomainError> {
        self.find(id).await?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User with ID {} not found", user_id)))?;

        if !user.belongs_to(id) {
            return Err(DomainError::validation(
                "User does not belong to this organization",
            ));
        }
        Ok(user)
    }

    async fn find_employee(&self, employee_id: Uuid) -> Result<Employee, DomainError> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| Self::employee_not_found(employee_id))
    }

    async fn counts(&self, id: Uuid) -> Result<OrganizationCounts, DomainError> {
        Ok(OrganizationCounts {
            users: self.users.count(Self::members(id)).await?,
            employees: self.employees.count_by_organization(id).await?,
        })
    }

    fn employee_not_found(employee_id: Uuid) -> DomainError {
        DomainError::not_found(format!("Employee with ID {} not found", employee_id))
    }

    fn members(id: Uuid) -> UserFilter {
        UserFilter {
            organization_id: Some(id),
            ..Default::default()
        }
    }

    /// Only a super admin hands out or takes away `SUPER_ADMIN`
    fn ensure_assignable(actor: &User, role: UserRole) -> Result<(), DomainError> {
        if role == UserRole::SuperAdmin && !actor.is_super_admin() {
            return Err(AuthError::InsufficientPermissions.into());
        }
        Ok(())
    }

    fn ensure_member(actor: &User, id: Uuid) -> Result<(), DomainError> {
        if actor.is_super_admin() || actor.belongs_to(id) {
            Ok(())
        } else {
            Err(DomainError::not_found(NOT_A_MEMBER))
        }
    }
}
