//! PostgreSQL adapter for ActivityRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::domain::entities::{Activity, ActivityId, ActivityType, NewActivity};
use crate::domain::ports::ActivityRepository;
use crate::entity::activities;
use crate::error::DomainError;

/// PostgreSQL implementation of ActivityRepository
pub struct PostgresActivityRepository {
    db: DatabaseConnection,
}

impl PostgresActivityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepository for PostgresActivityRepository {
    async fn recent(&self, limit: u64) -> Result<Vec<Activity>, DomainError> {
        let results = activities::Entity::find()
            .order_by_desc(activities::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Insert an activity row on `conn`, normally the transaction that wrote
/// the row it describes.
pub(crate) async fn append_activity<C: ConnectionTrait>(
    conn: &C,
    activity: &NewActivity,
    related_id: Uuid,
) -> Result<(), DomainError> {
    let model = activities::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_type: Set(activity.activity_type.to_string()),
        description: Set(activity.description.clone()),
        related_id: Set(Some(related_id)),
        created_at: Set(Utc::now().fixed_offset()),
    };

    model
        .insert(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}

/// Convert SeaORM model to domain entity
impl From<activities::Model> for Activity {
    fn from(model: activities::Model) -> Self {
        Activity {
            id: ActivityId(model.id),
            activity_type: model.activity_type.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    activity_id = %model.id,
                    value = %model.activity_type,
                    "Unknown activity type in database, reading as customer_added"
                );
                ActivityType::CustomerAdded
            }),
            description: model.description,
            related_id: model.related_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
