//! PostgreSQL adapter for EmployeeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::activity_repo::append_activity;
use crate::domain::entities::{Employee, EmployeeId, NewActivity, NewEmployee};
use crate::domain::ports::EmployeeRepository;
use crate::entity::employees;
use crate::error::DomainError;

/// PostgreSQL implementation of EmployeeRepository
pub struct PostgresEmployeeRepository {
    db: DatabaseConnection,
}

impl PostgresEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError> {
        let result = employees::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_active(&self) -> Result<Vec<Employee>, DomainError> {
        let results = employees::Entity::find()
            .filter(employees::Column::IsActive.eq(true))
            .order_by_desc(employees::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        employee: &NewEmployee,
        activity: &NewActivity,
    ) -> Result<Employee, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = employees::ActiveModel {
            id: Set(id),
            name: Set(employee.name.clone()),
            position: Set(employee.position.clone()),
            salary: Set(employee.salary),
            is_active: Set(employee.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        append_activity(&txn, activity, id).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn deactivate(&self, id: &EmployeeId) -> Result<(), DomainError> {
        let result = employees::Entity::update_many()
            .col_expr(employees::Column::IsActive, Expr::value(false))
            .col_expr(
                employees::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(employees::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("الموظف غير موجود".to_string()));
        }

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Employee {
            id: EmployeeId(model.id),
            name: model.name,
            position: model.position,
            salary: model.salary,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
