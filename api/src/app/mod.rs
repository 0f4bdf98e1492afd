//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain rules, ports, and storage.

pub mod customer_service;
pub mod dashboard_service;
pub mod employee_service;
pub mod ledger_service;
pub mod report_service;
pub mod user_service;

pub use customer_service::{CreateCustomer, CustomerService, CustomerView};
pub use dashboard_service::DashboardService;
pub use employee_service::{CreateEmployee, EmployeeService};
pub use ledger_service::{CreateExpense, CreateIncome, LedgerService};
pub use report_service::{ReportDescriptor, ReportService, ReportType};
pub use user_service::{hash_session_token, CreateUser, ProfileChanges, UserService};
