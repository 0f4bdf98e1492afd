//! Login session entity
//!
//! Only the SHA-256 hash of the session token is stored; the token itself
//! lives in the client's cookie.

use chrono::{DateTime, Utc};

use super::user::UserId;

/// A server-side login session
#[derive(Debug, Clone)]
pub struct Session {
    pub token_hash: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is no longer valid at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Data needed to open a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}
