//! Activity domain entity
//!
//! Append-only audit trail of mutating domain events. Activities are never
//! updated or deleted; the dashboard shows the most recent ones.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub Uuid);

impl ActivityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActivityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ActivityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Kind of domain event recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    CustomerAdded,
    SubscriptionRenewed,
    IncomeAdded,
    ExpenseAdded,
    EmployeeAdded,
    UserCreated,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::CustomerAdded => write!(f, "customer_added"),
            ActivityType::SubscriptionRenewed => write!(f, "subscription_renewed"),
            ActivityType::IncomeAdded => write!(f, "income_added"),
            ActivityType::ExpenseAdded => write!(f, "expense_added"),
            ActivityType::EmployeeAdded => write!(f, "employee_added"),
            ActivityType::UserCreated => write!(f, "user_created"),
        }
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer_added" => Ok(ActivityType::CustomerAdded),
            "subscription_renewed" => Ok(ActivityType::SubscriptionRenewed),
            "income_added" => Ok(ActivityType::IncomeAdded),
            "expense_added" => Ok(ActivityType::ExpenseAdded),
            "employee_added" => Ok(ActivityType::EmployeeAdded),
            "user_created" => Ok(ActivityType::UserCreated),
            _ => Err(format!("Unknown activity type: {}", s)),
        }
    }
}

/// A recorded domain event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub description: String,
    /// ID of the row the event is about
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Activity to append alongside a primary write.
///
/// The related ID is filled in by the repository once the primary row has
/// been inserted, inside the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub description: String,
}

impl NewActivity {
    pub fn customer_added(name: &str) -> Self {
        Self {
            activity_type: ActivityType::CustomerAdded,
            description: format!("تم إضافة عميل جديد: {}", name),
        }
    }

    pub fn subscription_renewed(name: &str) -> Self {
        Self {
            activity_type: ActivityType::SubscriptionRenewed,
            description: format!("تم تجديد اشتراك العميل: {}", name),
        }
    }

    pub fn income_added(amount: Decimal) -> Self {
        Self {
            activity_type: ActivityType::IncomeAdded,
            description: format!("تم تسجيل دخل بقيمة {} د.ع", amount),
        }
    }

    pub fn expense_added(amount: Decimal, reason: &str) -> Self {
        Self {
            activity_type: ActivityType::ExpenseAdded,
            description: format!("تم تسجيل مصروف بقيمة {} د.ع - {}", amount, reason),
        }
    }

    pub fn employee_added(name: &str) -> Self {
        Self {
            activity_type: ActivityType::EmployeeAdded,
            description: format!("تم إضافة موظف جديد: {}", name),
        }
    }

    pub fn user_created(username: &str) -> Self {
        Self {
            activity_type: ActivityType::UserCreated,
            description: format!("تم إنشاء حساب مستخدم جديد: {}", username),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn activity_type_roundtrips_through_text() {
        for t in [
            ActivityType::CustomerAdded,
            ActivityType::SubscriptionRenewed,
            ActivityType::IncomeAdded,
            ActivityType::ExpenseAdded,
            ActivityType::EmployeeAdded,
            ActivityType::UserCreated,
        ] {
            assert_eq!(t.to_string().parse::<ActivityType>().unwrap(), t);
        }
        assert!("warning_sent".parse::<ActivityType>().is_err());
    }

    #[test]
    fn activity_serializes_type_field() {
        let activity = Activity {
            id: ActivityId(Uuid::nil()),
            activity_type: ActivityType::SubscriptionRenewed,
            description: "x".to_string(),
            related_id: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "subscription_renewed");
        assert!(json.get("relatedId").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn descriptions_mention_the_subject() {
        assert!(NewActivity::customer_added("مطعم السلام")
            .description
            .contains("مطعم السلام"));
        assert!(NewActivity::income_added(dec!(150.50))
            .description
            .contains("150.50"));

        let expense = NewActivity::expense_added(dec!(20), "إيجار");
        assert_eq!(expense.activity_type, ActivityType::ExpenseAdded);
        assert!(expense.description.contains("إيجار"));
    }
}
