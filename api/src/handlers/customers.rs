//! Customer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use super::today;
use crate::app::{CreateCustomer, CustomerView};
use crate::auth::require;
use crate::domain::entities::{CustomerId, SubscriptionType, User};
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

const CUSTOMER_NOT_FOUND: &str = "العميل غير موجود";

/// Request body for creating a customer. The expiry date is derived.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "اسم العميل مطلوب"))]
    pub name: String,
    #[validate(length(max = 2048, message = "رابط المنيو طويل جداً"))]
    pub menu_url: Option<String>,
    pub join_date: NaiveDate,
    pub subscription_type: String,
    pub is_active: Option<bool>,
}

/// GET /api/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<CustomerView>>, AppError> {
    require(&user, Permission::ViewData)?;
    Ok(Json(state.customer_service.list(today()).await?))
}

/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerView>), AppError> {
    require(&user, Permission::ManageCustomers)?;

    let subscription_type: SubscriptionType = request.subscription_type.trim().parse()?;
    let customer = state
        .customer_service
        .create(
            CreateCustomer {
                name: request.name,
                menu_url: request.menu_url,
                join_date: request.join_date,
                subscription_type,
                is_active: request.is_active.unwrap_or(true),
            },
            today(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// PATCH /api/customers/:id/renew
pub async fn renew_customer(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, AppError> {
    require(&user, Permission::ManageCustomers)?;

    let id = CustomerId(super::parse_id(&id, CUSTOMER_NOT_FOUND)?);
    Ok(Json(state.customer_service.renew(&id, today()).await?))
}

/// GET /api/customers/expiring/:days
pub async fn expiring_customers(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(days): Path<String>,
) -> Result<Json<Vec<CustomerView>>, AppError> {
    require(&user, Permission::ViewData)?;

    let days: u32 = days
        .parse()
        .map_err(|_| AppError::BadRequest("عدد الأيام غير صحيح".to_string()))?;
    Ok(Json(state.customer_service.expiring(days, today()).await?))
}
