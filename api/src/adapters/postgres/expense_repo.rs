//! PostgreSQL adapter for ExpenseRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::activity_repo::append_activity;
use super::window_condition;
use crate::domain::entities::{ExpenseEntry, ExpenseEntryId, NewActivity, NewExpenseEntry};
use crate::domain::ports::ExpenseRepository;
use crate::domain::rules::DateWindow;
use crate::entity::expense_entries;
use crate::error::DomainError;

/// PostgreSQL implementation of ExpenseRepository
pub struct PostgresExpenseRepository {
    db: DatabaseConnection,
}

impl PostgresExpenseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn list(&self, window: &DateWindow) -> Result<Vec<ExpenseEntry>, DomainError> {
        let results = expense_entries::Entity::find()
            .filter(window_condition(expense_entries::Column::CreatedAt, window))
            .order_by_desc(expense_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        entry: &NewExpenseEntry,
        activity: &NewActivity,
    ) -> Result<ExpenseEntry, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = expense_entries::ActiveModel {
            id: Set(id),
            amount: Set(entry.amount),
            reason: Set(entry.reason.clone()),
            description: Set(entry.description.clone()),
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
}

/// Convert SeaORM model to domain entity
impl From<expense_entries::Model> for ExpenseEntry {
    fn from(model: expense_entries::Model) -> Self {
        ExpenseEntry {
            id: ExpenseEntryId(model.id),
            amount: model.amount,
            reason: model.reason,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
