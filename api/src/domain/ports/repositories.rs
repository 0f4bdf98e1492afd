//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Every write that is also an auditable event takes the `NewActivity` to
//! append. Implementations must store the row and the activity atomically,
//! setting the activity's related ID to the new row's ID.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::entities::{
    Activity, Customer, CustomerId, Employee, EmployeeId, ExpenseEntry, IncomeEntry, IncomeType,
    NewActivity, NewCustomer, NewEmployee, NewExpenseEntry, NewIncomeEntry, NewManualUser,
    NewSession, ProfileUpdate, Session, User, UserId,
};
use crate::domain::rules::DateWindow;
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List all users, newest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Create a manual user and log `activity`.
    ///
    /// Fails with `DomainError::Conflict` when the username or email is taken.
    async fn create_manual(
        &self,
        user: &NewManualUser,
        activity: &NewActivity,
    ) -> Result<User, DomainError>;

    /// Apply a profile update and return the updated user
    async fn update_profile(&self, id: &UserId, update: &ProfileUpdate)
        -> Result<User, DomainError>;
}

/// Repository for login sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a session
    async fn create(&self, session: &NewSession) -> Result<Session, DomainError>;

    /// Find a session by token hash
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DomainError>;

    /// Delete a session (no-op when absent)
    async fn delete(&self, token_hash: &str) -> Result<(), DomainError>;

    /// Delete every session that expired before `now`; returns the count removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

/// Repository for Customer entities
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a customer by ID
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, DomainError>;

    /// List all customers, newest first
    async fn list(&self) -> Result<Vec<Customer>, DomainError>;

    /// Create a customer and log `activity`
    async fn create(
        &self,
        customer: &NewCustomer,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError>;

    /// Set a new expiry date, reactivate the customer, and log `activity`
    async fn renew(
        &self,
        id: &CustomerId,
        expiry_date: NaiveDate,
        activity: &NewActivity,
    ) -> Result<Customer, DomainError>;

    /// Active customers whose expiry date is on or before `cutoff`
    async fn find_expiring(&self, cutoff: NaiveDate) -> Result<Vec<Customer>, DomainError>;
}

/// Repository for income entries
#[async_trait]
pub trait IncomeRepository: Send + Sync {
    /// List entries created within `window`, newest first
    async fn list(&self, window: &DateWindow) -> Result<Vec<IncomeEntry>, DomainError>;

    /// List entries of one type, newest first
    async fn list_by_type(&self, income_type: IncomeType) -> Result<Vec<IncomeEntry>, DomainError>;

    /// Record an entry and log `activity`
    async fn create(
        &self,
        entry: &NewIncomeEntry,
        activity: &NewActivity,
    ) -> Result<IncomeEntry, DomainError>;
}

/// Repository for expense entries
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// List entries created within `window`, newest first
    async fn list(&self, window: &DateWindow) -> Result<Vec<ExpenseEntry>, DomainError>;

    /// Record an entry and log `activity`
    async fn create(
        &self,
        entry: &NewExpenseEntry,
        activity: &NewActivity,
    ) -> Result<ExpenseEntry, DomainError>;
}

/// Repository for Employee entities
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find an employee by ID, active or not
    async fn find_by_id(&self, id: &EmployeeId) -> Result<Option<Employee>, DomainError>;

    /// List active employees, newest first
    async fn list_active(&self) -> Result<Vec<Employee>, DomainError>;

    /// Create an employee and log `activity`
    async fn create(
        &self,
        employee: &NewEmployee,
        activity: &NewActivity,
    ) -> Result<Employee, DomainError>;

    /// Mark an employee inactive
    async fn deactivate(&self, id: &EmployeeId) -> Result<(), DomainError>;
}

/// Read access to the activity log
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Most recent activities, newest first
    async fn recent(&self, limit: u64) -> Result<Vec<Activity>, DomainError>;
}

/// Aggregation queries feeding the dashboard and reports
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Number of active customers
    async fn active_customer_count(&self) -> Result<u64, DomainError>;

    /// Number of active customers whose expiry date is before `today`
    async fn expired_customer_count(&self, today: NaiveDate) -> Result<u64, DomainError>;

    /// Number of active customers expiring in `(today, cutoff]`
    async fn expiring_customer_count(
        &self,
        today: NaiveDate,
        cutoff: NaiveDate,
    ) -> Result<u64, DomainError>;

    /// Sum of income amounts within `window`, optionally of one type
    async fn income_total(
        &self,
        window: &DateWindow,
        income_type: Option<IncomeType>,
    ) -> Result<Decimal, DomainError>;

    /// Sum of expense amounts within `window`
    async fn expense_total(&self, window: &DateWindow) -> Result<Decimal, DomainError>;

    /// Number of active employees
    async fn active_employee_count(&self) -> Result<u64, DomainError>;

    /// Sum of salaries over active employees
    async fn active_salary_total(&self) -> Result<Decimal, DomainError>;
}
