//! Report handlers

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use validator::Validate;

use super::parse_date;
use crate::app::{ReportDescriptor, ReportType};
use crate::auth::require;
use crate::domain::entities::User;
use crate::domain::rules::Permission;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    #[validate(length(min = 1, message = "تاريخ البداية مطلوب"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "تاريخ النهاية مطلوب"))]
    pub end_date: String,
    #[validate(length(min = 1, message = "نوع التقرير مطلوب"))]
    pub report_type: String,
}

/// POST /api/reports/generate
pub async fn generate_report(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ValidatedJson(request): ValidatedJson<GenerateReportRequest>,
) -> Result<Json<ReportDescriptor>, AppError> {
    require(&user, Permission::GenerateReports)?;

    let start = parse_date(&request.start_date, "تاريخ البداية")?;
    let end = parse_date(&request.end_date, "تاريخ النهاية")?;
    let report_type: ReportType = request
        .report_type
        .parse()
        .map_err(|_| AppError::BadRequest("نوع التقرير غير صحيح".to_string()))?;

    let report = state
        .report_service
        .generate(report_type, start, end, chrono::Utc::now())
        .await?;

    tracing::info!(report_type = %report_type, user_id = %user.id, "Generated report");
    Ok(Json(report))
}
