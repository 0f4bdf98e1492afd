//! Authentication
//!
//! Password hashing and the session-cookie middleware.

pub mod password;
pub mod session;

pub use session::{removal_cookie, require, session_cookie, session_middleware, SESSION_COOKIE};
