//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod uploads;

pub use postgres::{
    PostgresActivityRepository, PostgresCustomerRepository, PostgresEmployeeRepository,
    PostgresExpenseRepository, PostgresIncomeRepository, PostgresSessionRepository,
    PostgresStatsRepository, PostgresUserRepository,
};
pub use uploads::LocalReceiptStore;
