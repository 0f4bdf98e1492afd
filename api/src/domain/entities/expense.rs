//! Expense entry domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an expense entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseEntryId(pub Uuid);

impl ExpenseEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ExpenseEntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ExpenseEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded expense. Immutable after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub id: ExpenseEntryId,
    pub amount: Decimal,
    pub reason: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new expense entry
#[derive(Debug, Clone)]
pub struct NewExpenseEntry {
    pub amount: Decimal,
    pub reason: String,
    pub description: Option<String>,
}
