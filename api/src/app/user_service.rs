//! User service
//!
//! Manual user management, password login and cookie sessions.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::domain::entities::{
    NewActivity, NewManualUser, NewSession, ProfileUpdate, Role, User, UserId,
};
use crate::domain::ports::{SessionRepository, UserRepository};
use crate::error::{AppError, DomainError};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

const INVALID_CREDENTIALS: &str = "اسم المستخدم أو كلمة المرور غير صحيحة";
const USERNAME_TAKEN: &str = "اسم المستخدم موجود بالفعل";
const EMAIL_TAKEN: &str = "البريد الإلكتروني مستخدم بالفعل";
const USER_NOT_FOUND: &str = "المستخدم غير موجود";
const PASSWORD_NOT_SUPPORTED: &str = "لا يمكن تعيين كلمة مرور لحساب لا يستخدم تسجيل الدخول اليدوي";

/// Input for creating a manual user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Requested profile changes; blank values are ignored
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Service for users and their sessions
pub struct UserService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    session_ttl: Duration,
}

impl<UR, SR> UserService<UR, SR>
where
    UR: UserRepository + ?Sized,
    SR: SessionRepository + ?Sized,
{
    pub fn new(users: Arc<UR>, sessions: Arc<SR>, session_ttl: Duration) -> Self {
        Self {
            users,
            sessions,
            session_ttl,
        }
    }

    /// List every user, newest first
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.list().await?)
    }

    /// Create a manual user with a hashed password
    pub async fn create(&self, input: CreateUser) -> Result<User, AppError> {
        let username = input.username.trim().to_string();
        validate_username(&username)?;
        validate_password(&input.password)?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict(USERNAME_TAKEN.to_string()).into());
        }

        let email = non_blank(input.email);
        if let Some(email) = &email {
            self.ensure_email_free(email, None).await?;
        }

        let new_user = NewManualUser {
            password_hash: hash_password_blocking(input.password).await?,
            role: input.role,
            email,
            first_name: non_blank(input.first_name),
            last_name: non_blank(input.last_name),
            username,
        };

        let user = self
            .users
            .create_manual(&new_user, &NewActivity::user_created(&new_user.username))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Created manual user");
        Ok(user)
    }

    /// Create the configured admin account unless the username already exists.
    ///
    /// Returns true when a user was created.
    pub async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        if self.users.find_by_username(username.trim()).await?.is_some() {
            return Ok(false);
        }

        self.create(CreateUser {
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Admin,
            email: None,
            first_name: None,
            last_name: None,
        })
        .await?;
        Ok(true)
    }

    /// Verify credentials and open a session.
    ///
    /// Returns the user and the plaintext token for the cookie. Unknown
    /// usernames and wrong passwords fail with the same message.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AppError> {
        let invalid = || AppError::Domain(DomainError::Unauthorized(INVALID_CREDENTIALS.to_string()));

        let user = self.users.find_by_username(username.trim()).await?;

        // Unknown users still pay for one verification
        let stored_hash = user
            .as_ref()
            .filter(|u| u.is_manual_user)
            .and_then(|u| u.password_hash.clone());
        let verified = verify_password_blocking(password.to_string(), stored_hash).await?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                tracing::info!(user_id = %user.id, "Rejected login");
                return Err(invalid());
            }
            None => return Err(invalid()),
        };

        let now = Utc::now();
        let purged = self.sessions.delete_expired(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Removed expired sessions");
        }

        let token = generate_session_token();
        self.sessions
            .create(&NewSession {
                token_hash: hash_session_token(&token),
                user_id: user.id,
                expires_at: now + self.session_ttl,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// End the session for `token`; unknown tokens are ignored
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.sessions.delete(&hash_session_token(token)).await?;
        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Expired sessions are deleted when seen.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<User, AppError> {
        let token_hash = hash_session_token(token);
        let session = self
            .sessions
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.is_expired(now) {
            self.sessions.delete(&token_hash).await?;
            return Err(AppError::Unauthorized);
        }

        self.users
            .find_by_id(&session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Apply profile changes to the user's own account
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        let current = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

        let password = non_blank(changes.password);
        if password.is_some() && !current.is_manual_user {
            return Err(AppError::BadRequest(PASSWORD_NOT_SUPPORTED.to_string()));
        }

        let username = non_blank(changes.username);
        if let Some(username) = &username {
            validate_username(username)?;
            if let Some(existing) = self.users.find_by_username(username).await? {
                if existing.id != *user_id {
                    return Err(DomainError::Conflict(USERNAME_TAKEN.to_string()).into());
                }
            }
        }

        let email = non_blank(changes.email);
        if let Some(email) = &email {
            self.ensure_email_free(email, Some(user_id)).await?;
        }

        let password_hash = match password {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password_blocking(password).await?)
            }
            None => None,
        };

        let update = ProfileUpdate {
            first_name: non_blank(changes.first_name),
            last_name: non_blank(changes.last_name),
            email,
            username,
            password_hash,
        };

        if update.is_empty() {
            return Ok(current);
        }

        let user = self.users.update_profile(user_id, &update).await?;
        tracing::info!(user_id = %user.id, "Updated profile");
        Ok(user)
    }

    /// Fail with a conflict when another user already has `email`
    async fn ensure_email_free(&self, email: &str, owner: Option<&UserId>) -> Result<(), AppError> {
        match self.users.find_by_email(email).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(DomainError::Conflict(EMAIL_TAKEN.to_string()).into())
            }
            _ => Ok(()),
        }
    }
}

fn validate_username(username: &str) -> Result<(), AppError> {
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AppError::BadRequest(format!(
            "اسم المستخدم يجب أن يكون {} أحرف على الأقل",
            MIN_USERNAME_LENGTH
        )));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "كلمة المرور يجب أن تكون {} أحرف على الأقل",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Trim and drop empty strings
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Generate a random session token
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Hash a session token for storage
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
