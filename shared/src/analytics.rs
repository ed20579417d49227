//! Chart series and history helpers built on daily totals

use crate::errors::ParseError;
use crate::insights::totals_by_date;
use crate::models::IntakeLog;
use chrono::{Datelike, DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const HISTORY_DEFAULT_DAYS: i64 = 30;
pub const HISTORY_DEFAULT_LIMIT: i64 = 100;
pub const HISTORY_MAX_LIMIT: i64 = 1000;
/// Years a history query may name
pub const HISTORY_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_ml: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAnalytics {
    pub days: Vec<DayProgress>,
    pub total_ml: i64,
    pub goal_ml: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAnalytics {
    pub days: Vec<DailyTotal>,
    pub total_ml: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub goal_ml: i64,
    pub progress_percent: i64,
    pub remaining_ml: i64,
}

/// Logs for one local day with their sum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub count: usize,
}

/// Window for trend charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendRange {
    #[default]
    Week,
    Month,
}

impl TrendRange {
    pub fn days(&self) -> i64 {
        match self {
            TrendRange::Week => 7,
            TrendRange::Month => 30,
        }
    }
}

impl FromStr for TrendRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" | "weekly" | "7d" => Ok(TrendRange::Week),
            "month" | "monthly" | "30d" => Ok(TrendRange::Month),
            other => Err(format!("Unknown trend range: {other}")),
        }
    }
}

/// UTC instants `[start, end)` covering local days `from..=to`, or `None`
/// when either edge falls outside chrono's calendar
pub fn utc_bounds(
    from: NaiveDate,
    to: NaiveDate,
    offset: &FixedOffset,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let shift = Duration::seconds(i64::from(offset.local_minus_utc()));
    let start = from.and_time(NaiveTime::MIN).checked_sub_signed(shift)?;
    let end = to.succ_opt()?.and_time(NaiveTime::MIN).checked_sub_signed(shift)?;
    Some((Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end)))
}

/// Totals for `days` consecutive dates ending on `last_day`, oldest first
pub fn daily_totals(
    logs: &[IntakeLog],
    last_day: NaiveDate,
    days: i64,
    offset: &FixedOffset,
) -> Vec<DailyTotal> {
    let totals = totals_by_date(logs, offset);
    (0..days.max(0))
        .rev()
        .map(|back| {
            let date = last_day - Duration::days(back);
            DailyTotal {
                date,
                total_ml: totals.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Percent of goal, rounded and capped at 100
pub fn percent_of_goal(total_ml: i64, goal_ml: i64) -> i64 {
    if goal_ml <= 0 {
        return 0;
    }
    ((total_ml as f64 / goal_ml as f64) * 100.0).round().min(100.0) as i64
}

pub fn weekly_analytics(
    logs: &[IntakeLog],
    goal_ml: i64,
    today: NaiveDate,
    offset: &FixedOffset,
) -> WeeklyAnalytics {
    let days: Vec<DayProgress> = daily_totals(logs, today, 7, offset)
        .into_iter()
        .map(|d| DayProgress {
            date: d.date,
            total_ml: d.total_ml,
            percent: percent_of_goal(d.total_ml, goal_ml),
        })
        .collect();
    let total_ml = days.iter().map(|d| d.total_ml).sum();

    WeeklyAnalytics {
        days,
        total_ml,
        goal_ml,
    }
}

pub fn monthly_analytics(
    logs: &[IntakeLog],
    today: NaiveDate,
    offset: &FixedOffset,
) -> MonthlyAnalytics {
    let days = daily_totals(logs, today, 30, offset);
    let total_ml = days.iter().map(|d| d.total_ml).sum();
    MonthlyAnalytics { days, total_ml }
}

/// Share of the seven-day goal met, capped at 100
pub fn performance_percent(total_7d_ml: i64, goal_ml: i64) -> i64 {
    percent_of_goal(total_7d_ml, goal_ml.saturating_mul(7))
}

pub fn daily_summary(date: NaiveDate, total_ml: i64, goal_ml: i64) -> DailySummary {
    DailySummary {
        date,
        total_ml,
        goal_ml,
        progress_percent: percent_of_goal(total_ml, goal_ml),
        remaining_ml: (goal_ml - total_ml).max(0),
    }
}

/// Resolve an optional `from`/`to` pair into an inclusive date range.
///
/// Defaults to the 30 days ending today. An inverted range falls back to
/// the 30 days ending at `to`. Dates outside [`HISTORY_YEARS`] are rejected.
pub fn resolve_history_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ParseError> {
    let to = supported_date("to", to.unwrap_or(today))?;
    let from = from.map(|date| supported_date("from", date)).transpose()?;
    let default_from = to - Duration::days(HISTORY_DEFAULT_DAYS - 1);
    Ok(match from {
        Some(from) if from <= to => (from, to),
        _ => (default_from, to),
    })
}

fn supported_date(field: &'static str, date: NaiveDate) -> Result<NaiveDate, ParseError> {
    if HISTORY_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(ParseError::DateOutOfRange { field, date })
    }
}

/// Page and limit clamped to their valid ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(HISTORY_DEFAULT_LIMIT)
                .clamp(1, HISTORY_MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Group logs by local day, newest day first
pub fn group_by_day(logs: &[IntakeLog], offset: &FixedOffset) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    let mut by_date = std::collections::BTreeMap::<NaiveDate, (i64, usize)>::new();
    for log in logs {
        let entry = by_date.entry(log.local_date(offset)).or_insert((0, 0));
        entry.0 += log.amount_ml;
        entry.1 += 1;
    }
    for (date, (total_ml, count)) in by_date.into_iter().rev() {
        groups.push(DayGroup {
            date,
            total_ml,
            count,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn log_at(amount: i64, y: i32, m: u32, day: u32, h: u32) -> IntakeLog {
        IntakeLog::new(
            Uuid::nil(),
            amount,
            Utc.with_ymd_and_hms(y, m, day, h, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_utc_bounds_shift_by_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let (start, end) = utc_bounds(d(2024, 5, 10), d(2024, 5, 10), &ist).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 9, 18, 30, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 5, 10, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_utc_bounds_at_calendar_edges_is_none() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        assert_eq!(utc_bounds(NaiveDate::MIN, d(2024, 5, 10), &ist), None);
        assert_eq!(utc_bounds(d(2024, 5, 10), NaiveDate::MAX, &ist), None);
    }

    #[test]
    fn test_daily_totals_fill_gaps_oldest_first() {
        let logs = vec![log_at(300, 2024, 5, 10, 8), log_at(200, 2024, 5, 10, 9), log_at(500, 2024, 5, 8, 9)];
        let totals = daily_totals(&logs, d(2024, 5, 10), 3, &utc());
        assert_eq!(
            totals,
            vec![
                DailyTotal { date: d(2024, 5, 8), total_ml: 500 },
                DailyTotal { date: d(2024, 5, 9), total_ml: 0 },
                DailyTotal { date: d(2024, 5, 10), total_ml: 500 },
            ]
        );
    }

    #[test]
    fn test_weekly_percent_capped() {
        let logs = vec![log_at(3000, 2024, 5, 10, 8), log_at(1000, 2024, 5, 9, 8)];
        let weekly = weekly_analytics(&logs, 2000, d(2024, 5, 10), &utc());
        assert_eq!(weekly.days.len(), 7);
        assert_eq!(weekly.days[6].percent, 100);
        assert_eq!(weekly.days[5].percent, 50);
        assert_eq!(weekly.total_ml, 4000);
        assert_eq!(weekly.goal_ml, 2000);
    }

    #[test]
    fn test_monthly_is_rolling_thirty_days() {
        let logs = vec![log_at(1000, 2024, 5, 10, 8), log_at(1000, 2024, 4, 11, 8), log_at(1000, 2024, 4, 10, 8)];
        let monthly = monthly_analytics(&logs, d(2024, 5, 10), &utc());
        assert_eq!(monthly.days.len(), 30);
        assert_eq!(monthly.days[0].date, d(2024, 4, 11));
        assert_eq!(monthly.total_ml, 2000);
    }

    #[rstest]
    #[case(14000, 2000, 100)]
    #[case(7000, 2000, 50)]
    #[case(20000, 2000, 100)]
    #[case(500, 0, 0)]
    fn test_performance(#[case] total: i64, #[case] goal: i64, #[case] expected: i64) {
        assert_eq!(performance_percent(total, goal), expected);
    }

    #[test]
    fn test_daily_summary_remaining_never_negative() {
        let summary = daily_summary(d(2024, 5, 10), 2500, 2000);
        assert_eq!(summary.progress_percent, 100);
        assert_eq!(summary.remaining_ml, 0);

        let summary = daily_summary(d(2024, 5, 10), 500, 2000);
        assert_eq!(summary.progress_percent, 25);
        assert_eq!(summary.remaining_ml, 1500);
    }

    #[test]
    fn test_history_range_resolution() {
        let today = d(2024, 5, 31);
        assert_eq!(resolve_history_range(None, None, today), Ok((d(2024, 5, 2), today)));
        assert_eq!(
            resolve_history_range(Some(d(2024, 5, 1)), Some(d(2024, 5, 3)), today),
            Ok((d(2024, 5, 1), d(2024, 5, 3)))
        );
        // inverted range falls back to 30 days ending at `to`
        assert_eq!(
            resolve_history_range(Some(d(2024, 5, 20)), Some(d(2024, 5, 10)), today),
            Ok((d(2024, 4, 11), d(2024, 5, 10)))
        );
    }

    #[rstest]
    #[case(None, Some(NaiveDate::MAX), "to")]
    #[case(Some(NaiveDate::MIN), None, "from")]
    #[case(Some(NaiveDate::MIN), Some(NaiveDate::MAX), "to")]
    #[case(Some(d(-1, 1, 1)), Some(d(2024, 5, 1)), "from")]
    #[case(None, Some(d(10_000, 1, 1)), "to")]
    fn test_history_range_rejects_extreme_dates(
        #[case] from: Option<NaiveDate>,
        #[case] to: Option<NaiveDate>,
        #[case] field: &str,
    ) {
        let err = resolve_history_range(from, to, d(2024, 5, 31)).unwrap_err();
        assert_eq!(err.field(), field);
    }

    #[test]
    fn test_history_range_at_supported_edges_has_bounds() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let (from, to) =
            resolve_history_range(Some(d(1, 1, 1)), Some(d(9999, 12, 31)), d(2024, 5, 31)).unwrap();
        assert!(utc_bounds(from, to, &ist).is_some());

        let (from, to) = resolve_history_range(None, Some(d(1, 1, 5)), d(2024, 5, 31)).unwrap();
        assert_eq!(from, d(0, 12, 7));
        assert!(utc_bounds(from, to, &ist).is_some());
    }

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(Some(0), Some(5000));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1000);

        let page = PageRequest::new(Some(3), Some(0));
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset(), 2);

        let page = PageRequest::default();
        assert_eq!(page.limit, 100);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(100), 1);
        assert_eq!(page.total_pages(101), 2);
    }

    #[test]
    fn test_group_by_day_descending() {
        let logs = vec![log_at(300, 2024, 5, 8, 8), log_at(200, 2024, 5, 10, 9), log_at(100, 2024, 5, 10, 7)];
        let groups = group_by_day(&logs, &utc());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, d(2024, 5, 10));
        assert_eq!(groups[0].total_ml, 300);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].date, d(2024, 5, 8));
    }

    #[test]
    fn test_trend_range_parse() {
        assert_eq!("Week".parse::<TrendRange>().unwrap(), TrendRange::Week);
        assert_eq!("month".parse::<TrendRange>().unwrap().days(), 30);
        assert!("year".parse::<TrendRange>().is_err());
    }
}
