//! Dashboard handlers

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::today;
use crate::auth::require;
use crate::domain::entities::{Activity, User};
use crate::domain::rules::{DashboardStats, Permission};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivitiesQuery {
    pub limit: Option<String>,
}

/// GET /api/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<DashboardStats>, AppError> {
    require(&user, Permission::ViewData)?;
    Ok(Json(state.dashboard_service.stats(today()).await?))
}

/// GET /api/activities?limit=
pub async fn recent_activities(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<Vec<Activity>>, AppError> {
    require(&user, Permission::ViewData)?;

    let limit = match query.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|_| AppError::BadRequest("قيمة الحد غير صحيحة".to_string()))?,
        ),
        None => None,
    };

    Ok(Json(state.dashboard_service.recent_activities(limit).await?))
}
