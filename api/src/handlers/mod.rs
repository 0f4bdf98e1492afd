//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. Every handler behind the
//! session middleware receives the current `User` and checks its permission
//! before calling into a service.

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod expenses;
pub mod income;
pub mod reports;
pub mod users;

pub use auth::{current_user, login, logout, update_profile};
pub use customers::{create_customer, expiring_customers, list_customers, renew_customer};
pub use dashboard::{dashboard_stats, recent_activities};
pub use employees::{create_employee, delete_employee, list_employees};
pub use expenses::{create_expense, list_expenses};
pub use income::{create_income, list_income, list_prints};
pub use reports::generate_report;
pub use users::{create_user, list_users};

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::rules::DateWindow;
use crate::error::AppError;

/// `?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD`, both optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn window(&self) -> Result<DateWindow, AppError> {
        let start = parse_optional_date(self.start_date.as_deref(), "تاريخ البداية")?;
        let end = parse_optional_date(self.end_date.as_deref(), "تاريخ النهاية")?;
        Ok(DateWindow::from_days(start, end)?)
    }
}

/// Parse a `YYYY-MM-DD` date; blank means absent
pub fn parse_optional_date(raw: Option<&str>, label: &str) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_date(value, label).map(Some),
        None => Ok(None),
    }
}

pub fn parse_date(raw: &str, label: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{} غير صحيح، الصيغة المطلوبة YYYY-MM-DD", label)))
}

/// Path IDs that are not UUIDs cannot name an existing row
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
