//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod receipts;
pub mod repositories;

pub use receipts::ReceiptStore;
pub use repositories::{
    ActivityRepository, CustomerRepository, EmployeeRepository, ExpenseRepository,
    IncomeRepository, SessionRepository, StatsRepository, UserRepository,
};
