//! Unified error types for the BizDesk API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic and persistence errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)
//!
//! Every message that can reach a client is Arabic. Storage and internal
//! failures are logged server-side and replaced by a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Generic message for failures whose details stay on the server
pub const INTERNAL_ERROR_MESSAGE: &str = "حدث خطأ داخلي في الخادم، يرجى المحاولة لاحقاً";

/// Message returned for missing, unknown or expired sessions
pub const UNAUTHORIZED_MESSAGE: &str = "يجب تسجيل الدخول أولاً";

/// Message returned when the role table denies an operation
pub const FORBIDDEN_MESSAGE: &str = "ليس لديك صلاحية لتنفيذ هذا الإجراء";

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid subscription type: {0}")]
    InvalidSubscriptionType(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

impl AppError {
    /// Status code and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(DomainError::NotFound(msg)) | AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, msg.clone())
            }
            // Duplicate usernames are reported as a plain bad request.
            AppError::Domain(DomainError::Conflict(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Domain(DomainError::Validation(msg)) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Domain(DomainError::InvalidSubscriptionType(value)) => (
                StatusCode::BAD_REQUEST,
                format!("نوع الاشتراك غير صحيح: {}", value),
            ),
            AppError::Domain(DomainError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, msg.clone())
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE.to_string()),
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::Domain(DomainError::Internal(msg)) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = AppError::Domain(DomainError::Validation("الاسم مطلوب".to_string()));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = AppError::Domain(DomainError::Conflict("اسم المستخدم موجود بالفعل".to_string()));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::Domain(DomainError::NotFound("العميل غير موجود".to_string()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::Domain(DomainError::Unauthorized("expired".to_string()))),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(AppError::Forbidden), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_error_hides_details() {
        let err = AppError::Domain(DomainError::Database(
            "relation \"customers\" does not exist".to_string(),
        ));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, INTERNAL_ERROR_MESSAGE);
        assert!(!message.contains("customers"));
    }

    #[test]
    fn invalid_subscription_type_names_the_value() {
        let err = AppError::Domain(DomainError::InvalidSubscriptionType("monthly".to_string()));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("monthly"));
    }
}
