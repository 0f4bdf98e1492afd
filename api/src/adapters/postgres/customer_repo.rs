//! PostgreSQL adapter for CustomerRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::activity_repo::append_activity;
use crate::domain::entities::{
    Customer, CustomerId, NewActivity, NewCustomer, SubscriptionType,
};
use crate::domain::ports::CustomerRepository;
use crate::entity::customers;
use crate::error::DomainError;

/// PostgreSQL implementation of CustomerRepository
pub struct PostgresCustomerRepository {
    db: DatabaseConnection,
}

impl PostgresCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError> {
        let result = customers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<Customer>, DomainError> {
        let results = customers::Entity::find()
            .order_by_desc(customers::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        customer: &NewCustomer,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = customers::ActiveModel {
            id: Set(id),
            name: Set(customer.name.clone()),
            menu_url: Set(customer.menu_url.clone()),
            join_date: Set(customer.join_date),
            subscription_type: Set(customer.subscription_type.to_string()),
            expiry_date: Set(customer.expiry_date),
            is_active: Set(customer.is_active),
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

    async fn renew(
        &self,
        id: &CustomerId,
        expiry_date: NaiveDate,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let existing = customers::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound("العميل غير موجود".to_string()))?;

        let mut model: customers::ActiveModel = existing.into();
        model.expiry_date = Set(expiry_date);
        model.is_active = Set(true);
        model.updated_at = Set(Utc::now().fixed_offset());

        let result = model
            .update(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        append_activity(&txn, activity, id.0).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_expiring(&self, cutoff: NaiveDate) -> Result<Vec<Customer>, DomainError> {
        let results = customers::Entity::find()
            .filter(customers::Column::IsActive.eq(true))
            .filter(customers::Column::ExpiryDate.lte(cutoff))
            .order_by_asc(customers::Column::ExpiryDate)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Customer {
            id: CustomerId(model.id),
            name: model.name,
            menu_url: model.menu_url,
            join_date: model.join_date,
            subscription_type: model.subscription_type.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    customer_id = %model.id,
                    value = %model.subscription_type,
                    "Unknown subscription type in database, reading as annual"
                );
                SubscriptionType::Annual
            }),
            expiry_date: model.expiry_date,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
