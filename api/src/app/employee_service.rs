//! Employee service
//!
//! Payroll records. Employees are never removed, only marked inactive.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entities::{Employee, EmployeeId, NewActivity, NewEmployee};
use crate::domain::ports::EmployeeRepository;
use crate::error::{AppError, DomainError};

/// Input for creating an employee
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub name: String,
    pub position: Option<String>,
    pub salary: Decimal,
    pub is_active: bool,
}

/// Service for managing employees
pub struct EmployeeService<ER>
where
    ER: EmployeeRepository + ?Sized,
{
    employees: Arc<ER>,
}

impl<ER> EmployeeService<ER>
where
    ER: EmployeeRepository + ?Sized,
{
    pub fn new(employees: Arc<ER>) -> Self {
        Self { employees }
    }

    /// Active employees, newest first
    pub async fn list_active(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.employees.list_active().await?)
    }

    pub async fn create(&self, input: CreateEmployee) -> Result<Employee, AppError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Validation("اسم الموظف مطلوب".to_string()).into());
        }
        if input.salary.is_sign_negative() && !input.salary.is_zero() {
            return Err(
                DomainError::Validation("الراتب يجب أن يكون صفراً أو أكثر".to_string()).into(),
            );
        }

        let new_employee = NewEmployee {
            position: input
                .position
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            salary: input.salary.round_dp(2),
            is_active: input.is_active,
            name,
        };

        let employee = self
            .employees
            .create(&new_employee, &NewActivity::employee_added(&new_employee.name))
            .await?;

        tracing::info!(employee_id = %employee.id, "Created employee");
        Ok(employee)
    }

    /// Soft delete.
    ///
    /// Unknown IDs are not found. Deactivating an inactive employee succeeds
    /// without writing anything.
    pub async fn deactivate(&self, id: &EmployeeId) -> Result<(), AppError> {
        let employee = self
            .employees
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("الموظف غير موجود".to_string()))?;

        if !employee.is_active {
            tracing::debug!(employee_id = %id, "Employee already inactive");
            return Ok(());
        }

        self.employees.deactivate(id).await?;
        tracing::info!(employee_id = %id, "Deactivated employee");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ActivityType;
    use crate::test_utils::{test_employee, InMemoryDb, InMemoryEmployeeRepository};
    use rust_decimal_macros::dec;

    fn create_service(db: &InMemoryDb) -> EmployeeService<InMemoryEmployeeRepository> {
        EmployeeService::new(Arc::new(db.employees()))
    }

    #[tokio::test]
    async fn create_logs_activity() {
        let db = InMemoryDb::new();
        let service = create_service(&db);

        let employee = service
            .create(CreateEmployee {
                name: "أحمد".to_string(),
                position: Some("مصمم".to_string()),
                salary: dec!(750000),
                is_active: true,
            })
            .await
            .unwrap();
        assert!(employee.is_active);

        let activities = db.activities();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_type, ActivityType::EmployeeAdded);
        assert_eq!(activities[0].related_id, Some(employee.id.0));
    }

    #[tokio::test]
    async fn negative_salary_is_rejected() {
        let db = InMemoryDb::new();
        let service = create_service(&db);

        let result = service
            .create(CreateEmployee {
                name: "x".to_string(),
                position: None,
                salary: dec!(-5),
                is_active: true,
            })
            .await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn deactivate_hides_employee_from_list() {
        let employee = test_employee("omar", dec!(500));
        let id = employee.id;
        let db = InMemoryDb::new().with_employee(employee);
        let service = create_service(&db);

        service.deactivate(&id).await.unwrap();
        assert!(service.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivating_inactive_employee_is_a_quiet_success() {
        let mut employee = test_employee("omar", dec!(500));
        employee.is_active = false;
        let id = employee.id;
        let db = InMemoryDb::new().with_employee(employee);
        let service = create_service(&db);

        service.deactivate(&id).await.unwrap();
        service.deactivate(&id).await.unwrap();

        let stored = db.employees().find_by_id(&id).await.unwrap().unwrap();
        assert!(!stored.is_active);
        assert!(db.activities().is_empty());
    }

    #[tokio::test]
    async fn deactivate_unknown_employee_is_not_found() {
        let db = InMemoryDb::new();
        let service = create_service(&db);

        let result = service.deactivate(&EmployeeId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
