//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod activity_repo;
pub mod customer_repo;
pub mod employee_repo;
pub mod expense_repo;
pub mod income_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod user_repo;


pub use activity_repo::PostgresActivityRepository;
pub use customer_repo::PostgresCustomerRepository;
pub use employee_repo::PostgresEmployeeRepository;
pub use expense_repo::PostgresExpenseRepository;
pub use income_repo::PostgresIncomeRepository;
pub use session_repo::PostgresSessionRepository;
pub use stats_repo::PostgresStatsRepository;
pub use user_repo::PostgresUserRepository;

use sea_orm::{ColumnTrait, Condition};

use crate::domain::rules::DateWindow;

/// Filter `column` to the half-open `window`
pub(crate) fn window_condition<C: ColumnTrait>(column: C, window: &DateWindow) -> Condition {
    let mut condition = Condition::all();
    if let Some(from) = window.from {
        condition = condition.add(column.gte(from.fixed_offset()));
    }
    if let Some(until) = window.until {
        condition = condition.add(column.lt(until.fixed_offset()));
    }
    condition
}
