//! Reporting periods
//!
//! Date filters arrive as calendar days and are turned into half-open UTC
//! timestamp windows `[from, until)`, so an end date includes the whole day.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};

use crate::error::DomainError;

/// Half-open timestamp window; a missing bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateWindow {
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

impl DateWindow {
    /// Window with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Window covering calendar days `start..=end`; each bound is optional
    pub fn from_days(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, DomainError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(DomainError::Validation(
                    "تاريخ البداية يجب أن يكون قبل تاريخ النهاية".to_string(),
                ));
            }
        }

        let until = match end {
            Some(end) => Some(start_of_day(end.checked_add_days(Days::new(1)).ok_or_else(
                || DomainError::Validation("تاريخ النهاية خارج النطاق المسموح".to_string()),
            )?)),
            None => None,
        };

        Ok(Self {
            from: start.map(start_of_day),
            until,
        })
    }

    /// Calendar month containing `today`
    pub fn month_of(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        let next = first.checked_add_months(Months::new(1));
        Self {
            from: Some(start_of_day(first)),
            until: next.map(start_of_day),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.until.map_or(true, |until| at < until)
    }
}
