//! Financial aggregation rules
//!
//! Turns the raw sums produced by the storage layer into the dashboard
//! snapshot. All amounts are `Decimal`; nothing here touches floating point.

use rust_decimal::Decimal;
use serde::Serialize;

/// Inventory must cover this multiple of the salary bill to count as healthy
pub const HEALTHY_SALARY_COVERAGE: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Overall financial health of the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialStatus {
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialStatus::Healthy => write!(f, "healthy"),
            FinancialStatus::Warning => write!(f, "warning"),
            FinancialStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Net cash position: everything earned minus everything spent
pub fn current_inventory(total_income: Decimal, total_expenses: Decimal) -> Decimal {
    total_income - total_expenses
}

/// Three-tier classifier over inventory and the active salary bill
pub fn classify(inventory: Decimal, total_salaries: Decimal) -> FinancialStatus {
    if inventory < total_salaries {
        FinancialStatus::Critical
    } else if inventory < total_salaries * HEALTHY_SALARY_COVERAGE {
        FinancialStatus::Warning
    } else {
        FinancialStatus::Healthy
    }
}

/// Aggregates read from storage for one dashboard snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub total_customers: u64,
    pub expired_subscriptions: u64,
    pub monthly_income: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_salaries: Decimal,
}

/// Dashboard statistics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_customers: u64,
    pub monthly_income: Decimal,
    pub expired_subscriptions: u64,
    pub current_inventory: Decimal,
    pub total_salaries: Decimal,
    pub financial_status: FinancialStatus,
}

impl From<LedgerTotals> for DashboardStats {
    fn from(totals: LedgerTotals) -> Self {
        let inventory = current_inventory(totals.total_income, totals.total_expenses);
        DashboardStats {
            total_customers: totals.total_customers,
            monthly_income: totals.monthly_income,
            expired_subscriptions: totals.expired_subscriptions,
            current_inventory: inventory,
            total_salaries: totals.total_salaries,
            financial_status: classify(inventory, totals.total_salaries),
        }
    }
}
