//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::entities::{
    Customer, CustomerId, Employee, EmployeeId, ExpenseEntry, ExpenseEntryId, IncomeEntry,
    IncomeEntryId, IncomeType, Role, SubscriptionType, User, UserId,
};

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Create a test customer with an annual subscription
pub fn test_customer(name: &str, expiry_date: NaiveDate) -> Customer {
    let now = Utc::now();
    Customer {
        id: CustomerId::new(),
        name: name.to_string(),
        menu_url: None,
        join_date: expiry_date - chrono::Months::new(12),
        subscription_type: SubscriptionType::Annual,
        expiry_date,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Create an active test employee
pub fn test_employee(name: &str, salary: Decimal) -> Employee {
    let now = Utc::now();
    Employee {
        id: EmployeeId::new(),
        name: name.to_string(),
        position: Some("مصمم".to_string()),
        salary,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Create an income entry recorded now
pub fn test_income(income_type: IncomeType, amount: Decimal) -> IncomeEntry {
    IncomeEntry {
        id: IncomeEntryId::new(),
        income_type,
        print_type: match income_type {
            IncomeType::Prints => Some("بوستر".to_string()),
            IncomeType::Subscription => None,
        },
        amount,
        customer_id: None,
        receipt_url: None,
        description: None,
        created_at: Utc::now(),
    }
}

/// Create an expense entry recorded now
pub fn test_expense(amount: Decimal) -> ExpenseEntry {
    let now = Utc::now();
    ExpenseEntry {
        id: ExpenseEntryId::new(),
        amount,
        reason: "إيجار".to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a manual user with the given role and password hash
pub fn test_user(username: &str, role: Role, password_hash: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        email: None,
        first_name: None,
        last_name: None,
        profile_image_url: None,
        username: Some(username.to_string()),
        password_hash: Some(password_hash.to_string()),
        role,
        is_manual_user: true,
        created_at: now,
        updated_at: now,
    }
}
