//! Report service
//!
//! Builds the data summary a report is rendered from. Rendering the
//! document itself happens on the client.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::IncomeType;
use crate::domain::ports::StatsRepository;
use crate::domain::rules::subscription::{expiring_cutoff, EXPIRING_SOON_DAYS};
use crate::domain::rules::DateWindow;
use crate::error::AppError;

const REPORT_CREATED: &str = "تم إنشاء التقرير بنجاح";

/// Kind of report requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Financial,
    Customers,
    Employees,
    Prints,
    Comprehensive,
}

impl ReportType {
    fn includes_financial(&self) -> bool {
        matches!(self, ReportType::Financial | ReportType::Comprehensive)
    }

    fn includes_prints(&self) -> bool {
        matches!(self, ReportType::Prints | ReportType::Comprehensive)
    }

    fn includes_customers(&self) -> bool {
        matches!(self, ReportType::Customers | ReportType::Comprehensive)
    }

    fn includes_employees(&self) -> bool {
        matches!(self, ReportType::Employees | ReportType::Comprehensive)
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Financial => write!(f, "financial"),
            ReportType::Customers => write!(f, "customers"),
            ReportType::Employees => write!(f, "employees"),
            ReportType::Prints => write!(f, "prints"),
            ReportType::Comprehensive => write!(f, "comprehensive"),
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "financial" => Ok(ReportType::Financial),
            "customers" => Ok(ReportType::Customers),
            "employees" => Ok(ReportType::Employees),
            "prints" => Ok(ReportType::Prints),
            "comprehensive" => Ok(ReportType::Comprehensive),
            _ => Err(format!("Unknown report type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSection {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintsSection {
    pub total_print_income: Decimal,
}

/// Customer counts as of the day the report is generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersSection {
    pub active: u64,
    pub expired: u64,
    pub expiring_soon: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeesSection {
    pub active: u64,
    pub total_salaries: Decimal,
}

/// Sections relevant to the requested report type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial: Option<FinancialSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prints: Option<PrintsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<CustomersSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<EmployeesSection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDescriptor {
    pub message: String,
    pub report_type: ReportType,
    pub period: ReportPeriod,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
}

/// Service for report summaries
pub struct ReportService<SR>
where
    SR: StatsRepository + ?Sized,
{
    stats: Arc<SR>,
}

impl<SR> ReportService<SR>
where
    SR: StatsRepository + ?Sized,
{
    pub fn new(stats: Arc<SR>) -> Self {
        Self { stats }
    }

    /// Summarise `start_date..=end_date` for `report_type`
    pub async fn generate(
        &self,
        report_type: ReportType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ReportDescriptor, AppError> {
        let window = DateWindow::from_days(Some(start_date), Some(end_date))?;
        let today = now.date_naive();
        let mut summary = ReportSummary::default();

        if report_type.includes_financial() {
            let total_income = self.stats.income_total(&window, None).await?;
            let total_expenses = self.stats.expense_total(&window).await?;
            summary.financial = Some(FinancialSection {
                total_income,
                total_expenses,
                net: total_income - total_expenses,
            });
        }

        if report_type.includes_prints() {
            summary.prints = Some(PrintsSection {
                total_print_income: self
                    .stats
                    .income_total(&window, Some(IncomeType::Prints))
                    .await?,
            });
        }

        if report_type.includes_customers() {
            let cutoff = expiring_cutoff(today, EXPIRING_SOON_DAYS as u32)?;
            summary.customers = Some(CustomersSection {
                active: self.stats.active_customer_count().await?,
                expired: self.stats.expired_customer_count(today).await?,
                expiring_soon: self.stats.expiring_customer_count(today, cutoff).await?,
            });
        }

        if report_type.includes_employees() {
            summary.employees = Some(EmployeesSection {
                active: self.stats.active_employee_count().await?,
                total_salaries: self.stats.active_salary_total().await?,
            });
        }

        tracing::info!(
            report_type = %report_type,
            start = %start_date,
            end = %end_date,
            "Generated report summary"
        );

        Ok(ReportDescriptor {
            message: REPORT_CREATED.to_string(),
            report_type,
            period: ReportPeriod {
                start_date,
                end_date,
            },
            generated_at: now,
            summary,
        })
    }
}
