//! Income handlers
//!
//! `POST /api/income` is a multipart form so a receipt file can travel with
//! the entry. Text fields are collected first, then validated as a whole.

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;

use super::DateRangeQuery;
use crate::app::CreateIncome;
use crate::auth::require;
use crate::domain::entities::{CustomerId, IncomeEntry, IncomeType, User};
use crate::domain::rules::{Permission, ReceiptUpload};
use crate::error::AppError;
use crate::AppState;

const MALFORMED_FORM: &str = "بيانات النموذج غير صحيحة";

/// Raw multipart fields before validation
#[derive(Debug, Default)]
struct IncomeForm {
    income_type: Option<String>,
    print_type: Option<String>,
    amount: Option<String>,
    customer_id: Option<String>,
    description: Option<String>,
    receipt: Option<ReceiptUpload>,
}

impl IncomeForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = IncomeForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "receipt" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    // Browsers send an empty part when no file is chosen
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.receipt = Some(ReceiptUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                "type" | "printType" | "amount" | "customerId" | "description" => {
                    let value = field.text().await.map_err(multipart_error)?;
                    let slot = match name.as_str() {
                        "type" => &mut form.income_type,
                        "printType" => &mut form.print_type,
                        "amount" => &mut form.amount,
                        "customerId" => &mut form.customer_id,
                        _ => &mut form.description,
                    };
                    *slot = Some(value);
                }
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown income form field");
                }
            }
        }

        Ok(form)
    }

    fn into_input(self) -> Result<CreateIncome, AppError> {
        let income_type: IncomeType = required(self.income_type, "نوع الدخل مطلوب")?
            .parse()
            .map_err(|_| AppError::BadRequest("نوع الدخل غير صحيح".to_string()))?;

        let amount: Decimal = required(self.amount, "المبلغ مطلوب")?
            .parse()
            .map_err(|_| AppError::BadRequest("المبلغ غير صحيح".to_string()))?;

        let customer_id = match self.customer_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(CustomerId(
                uuid::Uuid::parse_str(raw)
                    .map_err(|_| AppError::BadRequest("معرف العميل غير صحيح".to_string()))?,
            )),
            _ => None,
        };

        Ok(CreateIncome {
            income_type,
            print_type: self.print_type,
            amount,
            customer_id,
            description: self.description,
            receipt: self.receipt,
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

fn multipart_error(err: MultipartError) -> AppError {
    tracing::debug!(error = %err, "Rejected multipart body");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::BadRequest("حجم الملف يتجاوز الحد المسموح".to_string())
    } else {
        AppError::BadRequest(MALFORMED_FORM.to_string())
    }
}

/// GET /api/income?startDate=&endDate=
pub async fn list_income(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<IncomeEntry>>, AppError> {
    require(&user, Permission::ViewData)?;
    let window = range.window()?;
    Ok(Json(state.ledger_service.list_income(&window).await?))
}

/// GET /api/income/prints
pub async fn list_prints(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<IncomeEntry>>, AppError> {
    require(&user, Permission::ViewData)?;
    Ok(Json(state.ledger_service.list_prints().await?))
}

/// POST /api/income
pub async fn create_income(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<IncomeEntry>), AppError> {
    require(&user, Permission::ManageLedger)?;

    let input = IncomeForm::read(multipart).await?.into_input()?;
    let entry = state.ledger_service.create_income(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
