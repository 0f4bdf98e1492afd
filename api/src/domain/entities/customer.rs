//! Customer domain entity
//!
//! A subscribing customer of the company. The expiry date is always derived
//! from the join date and subscription cadence, never supplied by a client.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::rules::subscription::{self, ExpiryStatus};
use crate::error::DomainError;

/// Unique identifier for a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CustomerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription cadence, which determines the initial expiry offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubscriptionType {
    /// One year
    Annual,
    /// Six months
    SemiAnnual,
    /// Three months
    Quarterly,
}

impl SubscriptionType {
    /// Number of months the first subscription period lasts
    pub fn period_months(&self) -> u32 {
        match self {
            SubscriptionType::Annual => 12,
            SubscriptionType::SemiAnnual => 6,
            SubscriptionType::Quarterly => 3,
        }
    }
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionType::Annual => write!(f, "annual"),
            SubscriptionType::SemiAnnual => write!(f, "semi-annual"),
            SubscriptionType::Quarterly => write!(f, "quarterly"),
        }
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annual" => Ok(SubscriptionType::Annual),
            "semi-annual" => Ok(SubscriptionType::SemiAnnual),
            "quarterly" => Ok(SubscriptionType::Quarterly),
            _ => Err(DomainError::InvalidSubscriptionType(s.to_string())),
        }
    }
}

/// A customer with a subscription
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub menu_url: Option<String>,
    pub join_date: NaiveDate,
    pub subscription_type: SubscriptionType,
    pub expiry_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Classify the subscription relative to `today`
    pub fn expiry_status(&self, today: NaiveDate) -> ExpiryStatus {
        subscription::classify(self.expiry_date, today)
    }
}

/// Data needed to create a new customer.
///
/// Built by the customer service after the expiry date has been computed.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub menu_url: Option<String>,
    pub join_date: NaiveDate,
    pub subscription_type: SubscriptionType,
    pub expiry_date: NaiveDate,
    pub is_active: bool,
}
