//! Dashboard service
//!
//! Aggregate snapshot and the recent activity feed.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::Activity;
use crate::domain::ports::{ActivityRepository, StatsRepository};
use crate::domain::rules::{DashboardStats, DateWindow, LedgerTotals};
use crate::error::AppError;

pub const DEFAULT_ACTIVITY_LIMIT: u64 = 10;
pub const MAX_ACTIVITY_LIMIT: u64 = 100;

/// Service for dashboard data
pub struct DashboardService<SR, AR>
where
    SR: StatsRepository + ?Sized,
    AR: ActivityRepository + ?Sized,
{
    stats: Arc<SR>,
    activities: Arc<AR>,
}

impl<SR, AR> DashboardService<SR, AR>
where
    SR: StatsRepository + ?Sized,
    AR: ActivityRepository + ?Sized,
{
    pub fn new(stats: Arc<SR>, activities: Arc<AR>) -> Self {
        Self { stats, activities }
    }

    /// Compute the dashboard snapshot as of `today`
    pub async fn stats(&self, today: NaiveDate) -> Result<DashboardStats, AppError> {
        let all_time = DateWindow::unbounded();
        let totals = LedgerTotals {
            total_customers: self.stats.active_customer_count().await?,
            expired_subscriptions: self.stats.expired_customer_count(today).await?,
            monthly_income: self
                .stats
                .income_total(&DateWindow::month_of(today), None)
                .await?,
            total_income: self.stats.income_total(&all_time, None).await?,
            total_expenses: self.stats.expense_total(&all_time).await?,
            total_salaries: self.stats.active_salary_total().await?,
        };

        let stats = DashboardStats::from(totals);
        tracing::debug!(status = %stats.financial_status, "Computed dashboard stats");
        Ok(stats)
    }

    /// Most recent activities; `limit` defaults to 10 and is clamped to 1..=100
    pub async fn recent_activities(&self, limit: Option<u64>) -> Result<Vec<Activity>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        Ok(self.activities.recent(limit).await?)
    }
}
