//! Expense handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use super::DateRangeQuery;
use crate::app::CreateExpense;
use crate::auth::require;
use crate::domain::entities::{ExpenseEntry, User};
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Request body for recording an expense
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    pub amount: Decimal,
    #[validate(length(min = 1, message = "سبب المصروف مطلوب"))]
    pub reason: String,
    pub description: Option<String>,
}

/// GET /api/expenses?startDate=&endDate=
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<ExpenseEntry>>, AppError> {
    require(&user, Permission::ViewData)?;
    let window = range.window()?;
    Ok(Json(state.ledger_service.list_expenses(&window).await?))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseEntry>), AppError> {
    require(&user, Permission::ManageLedger)?;

    let entry = state
        .ledger_service
        .create_expense(CreateExpense {
            amount: request.amount,
            reason: request.reason,
            description: request.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
