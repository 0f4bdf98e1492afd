//! Request extractors
//!
//! `ValidatedJson` deserialises a JSON body and runs its `validator` rules
//! before the handler sees it, turning both kinds of failure into a 400 with
//! an Arabic message.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

const MALFORMED_BODY: &str = "بيانات الطلب غير صحيحة";

/// JSON body that has passed its validation rules
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e.body_text(), "Rejected request body");
            AppError::BadRequest(MALFORMED_BODY.to_string())
        })?;

        value
            .validate()
            .map_err(|e| AppError::BadRequest(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Join field messages in field-name order so responses are deterministic
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("قيمة الحقل {} غير صحيحة", field))
            })
        })
        .collect::<Vec<_>>()
        .join("، ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "الاسم مطلوب"))]
        name: String,
        #[validate(range(min = 1))]
        count: u32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"a","count":2}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "a");
        assert_eq!(payload.count, 2);
    }

    #[tokio::test]
    async fn rule_violations_use_field_messages() {
        let err =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"","count":0}"#), &())
                .await
                .err()
                .unwrap();
        match err {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "قيمة الحقل count غير صحيحة، الاسم مطلوب");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == MALFORMED_BODY));
    }
}
