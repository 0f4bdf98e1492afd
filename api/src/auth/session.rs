//! Session cookie authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

use crate::domain::entities::User;
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sid";

/// Cookie that carries a freshly issued session token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie that clears the session token in the browser
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Authentication middleware
///
/// Resolves the session cookie and injects the User into request extensions.
/// Missing, unknown and expired sessions are rejected with 401.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_service.authenticate(&token, Utc::now()).await?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Fail with 403 unless the user's role grants `permission`
pub fn require(user: &User, permission: Permission) -> Result<(), AppError> {
    if user.role.allows(permission) {
        Ok(())
    } else {
        tracing::info!(user_id = %user.id, role = %user.role, ?permission, "Permission denied");
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::test_utils::test_user;

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let cookie = session_cookie("abc".to_string(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn require_follows_role_table() {
        let viewer = test_user("viewer", Role::Viewer, "x");
        let editor = test_user("editor", Role::Editor, "x");
        let admin = test_user("admin", Role::Admin, "x");

        assert!(require(&viewer, Permission::ViewData).is_ok());
        assert!(matches!(
            require(&viewer, Permission::ManageCustomers),
            Err(AppError::Forbidden)
        ));
        assert!(require(&editor, Permission::ManageLedger).is_ok());
        assert!(require(&editor, Permission::ManageUsers).is_err());
        assert!(require(&admin, Permission::ManageUsers).is_ok());
    }
}
