//! In-memory employee repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::employee::Employee;
use crate::errors::DomainError;

use super::trait_::EmployeeRepository;

#[derive(Clone, Default)]
pub struct MockEmployeeRepository {
    employees: Arc<RwLock<HashMap<Uuid, Employee>>>,
}

impl MockEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for MockEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, DomainError> {
        self.employees
            .write()
            .await
            .insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, DomainError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Employee>, DomainError> {
        let employees = self.employees.read().await;
        let mut found: Vec<Employee> = employees
            .values()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn count_by_organization(&self, organization_id: Uuid) -> Result<u64, DomainError> {
        let employees = self.employees.read().await;
        Ok(employees
            .values()
            .filter(|e| e.organization_id == organization_id)
            .count() as u64)
    }

    async fn update(&self, employee: Employee) -> Result<Employee, DomainError> {
        let mut employees = self.employees.write().await;

        if !employees.contains_key(&employee.id) {
            return Err(DomainError::not_found(format!(
                "Employee with ID {} not found",
                employee.id
            )));
        }

        employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.employees.write().await.remove(&id).is_some())
    }
}
