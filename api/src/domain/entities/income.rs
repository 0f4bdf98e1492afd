//! Income entry domain entity
//!
//! Income is recorded once and never edited. Print income carries the kind
//! of print job; subscription income usually references a customer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::CustomerId;

/// Unique identifier for an income entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncomeEntryId(pub Uuid);

impl IncomeEntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IncomeEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for IncomeEntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for IncomeEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of an income entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeType {
    Prints,
    Subscription,
}

impl std::fmt::Display for IncomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncomeType::Prints => write!(f, "prints"),
            IncomeType::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for IncomeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prints" => Ok(IncomeType::Prints),
            "subscription" => Ok(IncomeType::Subscription),
            _ => Err(format!("Unknown income type: {}", s)),
        }
    }
}

/// A recorded income transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub id: IncomeEntryId,
    #[serde(rename = "type")]
    pub income_type: IncomeType,
    pub print_type: Option<String>,
    pub amount: Decimal,
    pub customer_id: Option<CustomerId>,
    pub receipt_url: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a new income entry
#[derive(Debug, Clone)]
pub struct NewIncomeEntry {
    pub income_type: IncomeType,
    pub print_type: Option<String>,
    pub amount: Decimal,
    pub customer_id: Option<CustomerId>,
    pub receipt_url: Option<String>,
    pub description: Option<String>,
}
