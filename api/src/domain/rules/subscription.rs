//! Subscription lifecycle rules
//!
//! Pure date arithmetic for customer subscriptions. Month arithmetic clamps
//! to the last day of the target month, so a subscription that starts on
//! 31 August and runs six months expires on the last day of February.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::domain::entities::SubscriptionType;
use crate::error::DomainError;

/// Window, in days, in which an upcoming expiry is flagged
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Months added to the current expiry by a renewal
pub const RENEWAL_MONTHS: u32 = 12;

/// Where a subscription stands relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Active,
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, DomainError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| DomainError::Validation(format!("التاريخ خارج النطاق المسموح: {}", date)))
}

/// Expiry date for a subscription that starts on `join_date`
pub fn compute_expiry(
    join_date: NaiveDate,
    subscription_type: SubscriptionType,
) -> Result<NaiveDate, DomainError> {
    add_months(join_date, subscription_type.period_months())
}

/// Expiry date after a renewal.
///
/// Renewals always extend by one year from the current expiry, whatever the
/// original cadence was.
pub fn renewed_expiry(current_expiry: NaiveDate) -> Result<NaiveDate, DomainError> {
    add_months(current_expiry, RENEWAL_MONTHS)
}

pub fn is_expired(expiry: NaiveDate, today: NaiveDate) -> bool {
    expiry < today
}

pub fn is_expiring_soon(expiry: NaiveDate, today: NaiveDate) -> bool {
    let days_left = (expiry - today).num_days();
    days_left > 0 && days_left <= EXPIRING_SOON_DAYS
}

pub fn classify(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    if is_expired(expiry, today) {
        ExpiryStatus::Expired
    } else if is_expiring_soon(expiry, today) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Active
    }
}

/// Latest expiry date that counts as "expiring within `days` days"
pub fn expiring_cutoff(today: NaiveDate, days: u32) -> Result<NaiveDate, DomainError> {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| DomainError::Validation("عدد الأيام كبير جداً".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn annual_adds_one_year() {
        assert_eq!(
            compute_expiry(date(2024, 1, 15), SubscriptionType::Annual).unwrap(),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn semi_annual_adds_six_months() {
        assert_eq!(
            compute_expiry(date(2024, 1, 15), SubscriptionType::SemiAnnual).unwrap(),
            date(2024, 7, 15)
        );
        assert_eq!(
            compute_expiry(date(2024, 9, 10), SubscriptionType::SemiAnnual).unwrap(),
            date(2025, 3, 10)
        );
    }

    #[test]
    fn quarterly_adds_three_months() {
        assert_eq!(
            compute_expiry(date(2024, 1, 15), SubscriptionType::Quarterly).unwrap(),
            date(2024, 4, 15)
        );
        assert_eq!(
            compute_expiry(date(2024, 11, 5), SubscriptionType::Quarterly).unwrap(),
            date(2025, 2, 5)
        );
    }

    #[test]
    fn month_arithmetic_clamps_to_month_end() {
        assert_eq!(
            compute_expiry(date(2024, 8, 31), SubscriptionType::SemiAnnual).unwrap(),
            date(2025, 2, 28)
        );
        assert_eq!(
            compute_expiry(date(2024, 2, 29), SubscriptionType::Annual).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn renewal_is_a_flat_year() {
        assert_eq!(renewed_expiry(date(2024, 6, 1)).unwrap(), date(2025, 6, 1));
    }

    #[test]
    fn expired_is_strictly_before_today() {
        let today = date(2025, 1, 1);
        assert!(is_expired(date(2024, 12, 31), today));
        assert!(!is_expired(today, today));
        assert!(!is_expired(date(2025, 1, 2), today));
    }

    #[test]
    fn expiring_soon_window() {
        let today = date(2025, 1, 1);
        assert!(is_expiring_soon(date(2025, 1, 20), today));
        assert!(is_expiring_soon(date(2025, 1, 2), today));
        assert!(is_expiring_soon(date(2025, 1, 31), today));
        assert!(!is_expiring_soon(date(2025, 2, 1), today));
        assert!(!is_expiring_soon(today, today));
        assert!(!is_expiring_soon(date(2024, 12, 31), today));
    }

    #[test]
    fn far_expiry_is_neither() {
        let today = date(2025, 1, 1);
        let expiry = date(2025, 3, 1);
        assert!(!is_expired(expiry, today));
        assert!(!is_expiring_soon(expiry, today));
        assert_eq!(classify(expiry, today), ExpiryStatus::Active);
    }

    #[test]
    fn classify_each_state() {
        let today = date(2025, 1, 1);
        assert_eq!(classify(date(2024, 12, 31), today), ExpiryStatus::Expired);
        assert_eq!(classify(date(2025, 1, 20), today), ExpiryStatus::ExpiringSoon);
        // Expiring today is neither expired nor within the (0, 30] window.
        assert_eq!(classify(today, today), ExpiryStatus::Active);
    }

    #[test]
    fn expiring_cutoff_adds_days() {
        assert_eq!(
            expiring_cutoff(date(2025, 1, 1), 30).unwrap(),
            date(2025, 1, 31)
        );
        assert_eq!(expiring_cutoff(date(2025, 1, 1), 0).unwrap(), date(2025, 1, 1));
    }
}
