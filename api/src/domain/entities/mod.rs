//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod activity;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod income;
pub mod session;
pub mod user;

pub use activity::{Activity, ActivityId, ActivityType, NewActivity};
pub use customer::{Customer, CustomerId, NewCustomer, SubscriptionType};
pub use employee::{Employee, EmployeeId, NewEmployee};
pub use expense::{ExpenseEntry, ExpenseEntryId, NewExpenseEntry};
pub use income::{IncomeEntry, IncomeEntryId, IncomeType, NewIncomeEntry};
pub use session::{NewSession, Session};
pub use user::{NewManualUser, ProfileUpdate, Role, User, UserId};
