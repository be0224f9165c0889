//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::Uuid;

use rv_core::domain::entities::user::{User, UserRole};
use rv_core::errors::DomainError;
use rv_core::repositories::{UserFilter, UserRepository};

use super::{column, is_duplicate_key, optional_uuid_column, query_error, uuid_column};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, \
                            organization_id, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let role: String = column(row, "role")?;

        Ok(User {
            id: uuid_column(row, "id")?,
            first_name: column(row, "first_name")?,
            last_name: column(row, "last_name")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            role: role.parse::<UserRole>().map_err(DomainError::internal)?,
            organization_id: optional_uuid_column(row, "organization_id")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    fn push_filter(builder: &mut QueryBuilder<'_, MySql>, filter: UserFilter) {
        builder.push(" WHERE 1 = 1");
        if let Some(role) = filter.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        if let Some(organization_id) = filter.organization_id {
            builder
                .push(" AND organization_id = ")
                .push_bind(organization_id.to_string());
        }
    }

    async fn fetch_one_by(&self, column_name: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column_name);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("id", id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email.to_string()).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role,
                               organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.organization_id.map(|id| id.to_string()))
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    DomainError::conflict("Email already exists")
                } else {
                    query_error("Failed to create user", e)
                }
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users
            SET first_name = ?, last_name = ?, email = ?, password_hash = ?, role = ?,
                organization_id = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.organization_id.map(|id| id.to_string()))
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    DomainError::conflict("Email already exists")
                } else {
                    query_error("Failed to update user", e)
                }
            })?;

        // MySQL reports zero affected rows when nothing changed, so confirm existence
        if result.rows_affected() == 0 && self.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::not_found(format!("User with ID {} not found", user.id)));
        }

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, DomainError> {
        let mut builder = QueryBuilder::<MySql>::new(format!("SELECT {} FROM users", USER_COLUMNS));
        Self::push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to list users", e))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn count(&self, filter: UserFilter) -> Result<u64, DomainError> {
        let mut builder = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM users");
        Self::push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_error("Failed to count users", e))?;

        Ok(count.max(0) as u64)
    }
}
