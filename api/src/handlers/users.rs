//! User management handlers (admin only)

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use crate::app::CreateUser;
use crate::auth::require;
use crate::domain::entities::{Role, User};
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Request body for creating a manual user
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "اسم المستخدم مطلوب"))]
    pub username: String,
    #[validate(length(min = 1, message = "كلمة المرور مطلوبة"))]
    pub password: String,
    pub role: Option<String>,
    #[validate(length(max = 255, message = "البريد الإلكتروني طويل جداً"))]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<User>>, AppError> {
    require(&user, Permission::ManageUsers)?;
    Ok(Json(state.user_service.list().await?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    require(&user, Permission::ManageUsers)?;

    let role = match request.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw
            .parse::<Role>()
            .map_err(|_| AppError::BadRequest("الدور غير صحيح".to_string()))?,
        None => Role::Viewer,
    };

    let created = state
        .user_service
        .create(CreateUser {
            username: request.username,
            password: request.password,
            role,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
