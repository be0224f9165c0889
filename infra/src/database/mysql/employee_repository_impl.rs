//! MySQL implementation of the EmployeeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use rv_core::domain::entities::employee::Employee;
use rv_core::errors::DomainError;
use rv_core::repositories::EmployeeRepository;

use super::{column, query_error, uuid_column};

const EMPLOYEE_COLUMNS: &str =
    "id, first_name, last_name, birth_date, position, organization_id, created_at, updated_at";

pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_employee(row: &MySqlRow) -> Result<Employee, DomainError> {
        Ok(Employee {
            id: uuid_column(row, "id")?,
            first_name: column(row, "first_name")?,
            last_name: column(row, "last_name")?,
            birth_date: column::<NaiveDate>(row, "birth_date")?,
            position: column(row, "position")?,
            organization_id: uuid_column(row, "organization_id")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, DomainError> {
        let query = r#"
            INSERT INTO employees (id, first_name, last_name, birth_date, position,
                                   organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(employee.id.to_string())
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(employee.birth_date)
            .bind(&employee.position)
            .bind(employee.organization_id.to_string())
            .bind(employee.created_at)
            .bind(employee.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to create employee", e))?;

        tracing::info!(
            employee_id = %employee.id,
            organization_id = %employee.organization_id,
            "Created employee"
        );
        Ok(employee)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DomainError> {
        let query = format!("SELECT {} FROM employees WHERE id = ?", EMPLOYEE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("Failed to find employee", e))?;

        row.as_ref().map(Self::row_to_employee).transpose()
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Employee>, DomainError> {
        let query = format!(
            "SELECT {} FROM employees WHERE organization_id = ? ORDER BY created_at DESC",
            EMPLOYEE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(organization_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_error("Failed to list employees", e))?;

        rows.iter().map(Self::row_to_employee).collect()
    }

    async fn count_by_organization(&self, organization_id: Uuid) -> Result<u64, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE organization_id = ?")
                .bind(organization_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| query_error("Failed to count employees", e))?;

        Ok(count.max(0) as u64)
    }

    async fn update(&self, employee: Employee) -> Result<Employee, DomainError> {
        let query = r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, birth_date = ?, position = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(employee.birth_date)
            .bind(&employee.position)
            .bind(employee.updated_at)
            .bind(employee.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to update employee", e))?;

        if result.rows_affected() == 0 && self.find_by_id(employee.id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "Employee with ID {} not found",
                employee.id
            )));
        }

        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("Failed to delete employee", e))?;

        Ok(result.rows_affected() > 0)
    }
}
