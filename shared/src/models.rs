//! Data models for the hydration tracker

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single logged drink, always in milliliters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i64,
    pub logged_at: DateTime<Utc>,
}

impl IntakeLog {
    pub fn new(user_id: Uuid, amount_ml: i64, logged_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount_ml,
            logged_at,
        }
    }

    /// Calendar date of the log in the given offset
    pub fn local_date(&self, offset: &FixedOffset) -> NaiveDate {
        self.logged_at.with_timezone(offset).date_naive()
    }

    /// Local wall-clock time as `HH:MM`
    pub fn local_time_label(&self, offset: &FixedOffset) -> String {
        self.logged_at.with_timezone(offset).format("%H:%M").to_string()
    }
}

/// Sum of amounts for logs on `date` in the given offset
pub fn total_on(logs: &[IntakeLog], date: NaiveDate, offset: &FixedOffset) -> i64 {
    logs.iter()
        .filter(|log| log.local_date(offset) == date)
        .map(|log| log.amount_ml)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_date_follows_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        // 20:00 UTC is 01:30 the next day in +05:30
        let log = IntakeLog::new(
            Uuid::new_v4(),
            250,
            Utc.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap(),
        );
        assert_eq!(log.local_date(&ist), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(log.local_time_label(&ist), "01:30");
    }

    #[test]
    fn test_total_on_ignores_other_days() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let user = Uuid::new_v4();
        let logs = vec![
            IntakeLog::new(user, 300, Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()),
            IntakeLog::new(user, 200, Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 0).unwrap()),
            IntakeLog::new(user, 500, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(total_on(&logs, day, &utc), 500);
    }
}
