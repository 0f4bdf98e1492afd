//! Employee handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::app::CreateEmployee;
use crate::auth::require;
use crate::domain::entities::{Employee, EmployeeId, User};
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

/// Request body for creating an employee
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "اسم الموظف مطلوب"))]
    pub name: String,
    #[validate(length(max = 255, message = "المسمى الوظيفي طويل جداً"))]
    pub position: Option<String>,
    pub salary: Decimal,
    pub is_active: Option<bool>,
}

/// GET /api/employees
///
/// Active employees only.
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Employee>>, AppError> {
    require(&user, Permission::ViewData)?;
    Ok(Json(state.employee_service.list_active().await?))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    require(&user, Permission::ManageEmployees)?;

    let employee = state
        .employee_service
        .create(CreateEmployee {
            name: request.name,
            position: request.position,
            salary: request.salary,
            is_active: request.is_active.unwrap_or(true),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// DELETE /api/employees/:id
///
/// Soft delete; repeating it still answers 204.
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require(&user, Permission::ManageEmployees)?;

    let id = EmployeeId(super::parse_id(&id, "الموظف غير موجود")?);
    state.employee_service.deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
