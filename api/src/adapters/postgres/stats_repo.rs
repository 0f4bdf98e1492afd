//! PostgreSQL adapter for StatsRepository
//!
//! Aggregates are computed in SQL so the dashboard never loads full tables.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

use super::window_condition;
use crate::domain::entities::IncomeType;
use crate::domain::ports::StatsRepository;
use crate::domain::rules::DateWindow;
use crate::entity::{customers, employees, expense_entries, income_entries};
use crate::error::DomainError;

/// PostgreSQL implementation of StatsRepository
pub struct PostgresStatsRepository {
    db: DatabaseConnection,
}

impl PostgresStatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    async fn active_customer_count(&self) -> Result<u64, DomainError> {
        customers::Entity::find()
            .filter(customers::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn expired_customer_count(&self, today: NaiveDate) -> Result<u64, DomainError> {
        customers::Entity::find()
            .filter(customers::Column::IsActive.eq(true))
            .filter(customers::Column::ExpiryDate.lt(today))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn expiring_customer_count(
        &self,
        today: NaiveDate,
        cutoff: NaiveDate,
    ) -> Result<u64, DomainError> {
        customers::Entity::find()
            .filter(customers::Column::IsActive.eq(true))
            .filter(customers::Column::ExpiryDate.gt(today))
            .filter(customers::Column::ExpiryDate.lte(cutoff))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn income_total(
        &self,
        window: &DateWindow,
        income_type: Option<IncomeType>,
    ) -> Result<Decimal, DomainError> {
        let mut query = income_entries::Entity::find()
            .filter(window_condition(income_entries::Column::CreatedAt, window));
        if let Some(income_type) = income_type {
            query = query.filter(income_entries::Column::IncomeType.eq(income_type.to_string()));
        }

        // SUM over zero rows is NULL
        let result: Option<Option<Decimal>> = query
            .select_only()
            .column_as(Expr::col(income_entries::Column::Amount).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn expense_total(&self, window: &DateWindow) -> Result<Decimal, DomainError> {
        let result: Option<Option<Decimal>> = expense_entries::Entity::find()
            .filter(window_condition(expense_entries::Column::CreatedAt, window))
            .select_only()
            .column_as(Expr::col(expense_entries::Column::Amount).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn active_employee_count(&self) -> Result<u64, DomainError> {
        employees::Entity::find()
            .filter(employees::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn active_salary_total(&self) -> Result<Decimal, DomainError> {
        let result: Option<Option<Decimal>> = employees::Entity::find()
            .filter(employees::Column::IsActive.eq(true))
            .select_only()
            .column_as(Expr::col(employees::Column::Salary).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.flatten().unwrap_or(Decimal::ZERO))
    }
}
