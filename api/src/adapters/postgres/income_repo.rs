//! PostgreSQL adapter for IncomeRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::activity_repo::append_activity;
use super::window_condition;
use crate::domain::entities::{
    CustomerId, IncomeEntry, IncomeEntryId, IncomeType, NewActivity, NewIncomeEntry,
};
use crate::domain::ports::IncomeRepository;
use crate::domain::rules::DateWindow;
use crate::entity::income_entries;
use crate::error::DomainError;

/// PostgreSQL implementation of IncomeRepository
pub struct PostgresIncomeRepository {
    db: DatabaseConnection,
}

impl PostgresIncomeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IncomeRepository for PostgresIncomeRepository {
    async fn list(&self, window: &DateWindow) -> Result<Vec<IncomeEntry>, DomainError> {
        let results = income_entries::Entity::find()
            .filter(window_condition(income_entries::Column::CreatedAt, window))
            .order_by_desc(income_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_by_type(&self, income_type: IncomeType) -> Result<Vec<IncomeEntry>, DomainError> {
        let results = income_entries::Entity::find()
            .filter(income_entries::Column::IncomeType.eq(income_type.to_string()))
            .order_by_desc(income_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        entry: &NewIncomeEntry,
        activity: &NewActivity,
    ) -> Result<IncomeEntry, DomainError> {
        let id = Uuid::new_v4();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = income_entries::ActiveModel {
            id: Set(id),
            customer_id: Set(entry.customer_id.map(|c| c.0)),
            income_type: Set(entry.income_type.to_string()),
            print_type: Set(entry.print_type.clone()),
            amount: Set(entry.amount),
            receipt_url: Set(entry.receipt_url.clone()),
            description: Set(entry.description.clone()),
            created_at: Set(Utc::now().fixed_offset()),
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
impl From<income_entries::Model> for IncomeEntry {
    fn from(model: income_entries::Model) -> Self {
        IncomeEntry {
            id: IncomeEntryId(model.id),
            income_type: model.income_type.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    income_id = %model.id,
                    value = %model.income_type,
                    "Unknown income type in database, reading as prints"
                );
                IncomeType::Prints
            }),
            print_type: model.print_type,
            amount: model.amount,
            customer_id: model.customer_id.map(CustomerId),
            receipt_url: model.receipt_url,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
