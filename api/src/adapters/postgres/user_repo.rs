//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::activity_repo::append_activity;
use crate::domain::entities::{
    NewActivity, NewManualUser, ProfileUpdate, Role, User, UserId,
};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

pub(crate) const USERNAME_TAKEN: &str = "اسم المستخدم موجود بالفعل";
pub(crate) const EMAIL_TAKEN: &str = "البريد الإلكتروني مستخدم بالفعل";

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a write error, turning unique violations into a conflict naming
/// the violated column
fn write_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            DomainError::Conflict(unique_violation_message(&detail).to_string())
        }
        _ => DomainError::Database(e.to_string()),
    }
}

/// Postgres names the constraint (`users_email_key`) in the error text
fn unique_violation_message(detail: &str) -> &'static str {
    if detail.contains("email") {
        EMAIL_TAKEN
    } else {
        USERNAME_TAKEN
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let results = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create_manual(
        &self,
        user: &NewManualUser,
        activity: &NewActivity,
    ) -> Result<User, DomainError> {
        let id = Uuid::new_v4();
        let now = Utc::now().fixed_offset();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let model = users::ActiveModel {
            id: Set(id),
            email: Set(user.email.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            profile_image_url: Set(None),
            username: Set(Some(user.username.clone())),
            password: Set(Some(user.password_hash.clone())),
            role: Set(user.role.to_string()),
            is_manual_user: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&txn).await.map_err(write_err)?;

        append_activity(&txn, activity, id).await?;

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, DomainError> {
        let existing = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound("المستخدم غير موجود".to_string()))?;

        let mut model: users::ActiveModel = existing.into();
        if let Some(first_name) = &update.first_name {
            model.first_name = Set(Some(first_name.clone()));
        }
        if let Some(last_name) = &update.last_name {
            model.last_name = Set(Some(last_name.clone()));
        }
        if let Some(email) = &update.email {
            model.email = Set(Some(email.clone()));
        }
        if let Some(username) = &update.username {
            model.username = Set(Some(username.clone()));
        }
        if let Some(password_hash) = &update.password_hash {
            model.password = Set(Some(password_hash.clone()));
        }
        model.updated_at = Set(Utc::now().fixed_offset());

        let result = model.update(&self.db).await.map_err(write_err)?;

        Ok(result.into())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            profile_image_url: model.profile_image_url,
            username: model.username,
            password_hash: model.password,
            role: model.role.parse().unwrap_or(Role::Viewer),
            is_manual_user: model.is_manual_user,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
