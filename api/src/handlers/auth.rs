//! Authentication handlers
//!
//! Login, logout and the current user's own profile.

use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::app::ProfileChanges;
use crate::auth::{removal_cookie, session_cookie, SESSION_COOKIE};
use crate::domain::entities::User;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Request body for login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "اسم المستخدم مطلوب"))]
    pub username: String,
    #[validate(length(min = 1, message = "كلمة المرور مطلوبة"))]
    pub password: String,
}

/// Request body for a profile update; omitted or blank fields are unchanged
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "الاسم الأول طويل جداً"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "اسم العائلة طويل جداً"))]
    pub last_name: Option<String>,
    #[validate(length(max = 255, message = "البريد الإلكتروني طويل جداً"))]
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/login
///
/// Verify credentials and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<User>), AppError> {
    let (user, token) = state
        .user_service
        .login(&request.username, &request.password)
        .await?;

    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    Ok((jar, Json(user)))
}

/// POST /api/logout
///
/// Delete the session, if any, and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.user_service.logout(cookie.value()).await?;
    }
    Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT))
}

/// GET /api/auth/user
pub async fn current_user(Extension(user): Extension<User>) -> Json<User> {
    Json(user)
}

/// PUT /api/auth/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let updated = state
        .user_service
        .update_profile(
            &user.id,
            ProfileChanges {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                username: request.username,
                password: request.password,
            },
        )
        .await?;

    Ok(Json(updated))
}
