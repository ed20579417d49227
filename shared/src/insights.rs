//! Intake log aggregation: weekly average, month-over-month change,
//! goal streak and badge
//!
//! Days are local calendar dates in the offset of `now`.

use crate::models::IntakeLog;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Days of history loaded for insights; bounds the streak and always covers
/// the previous calendar month
pub const INSIGHTS_LOOKBACK_DAYS: i64 = 366;

/// Streak milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Start Your Journey")]
    StartYourJourney,
    #[serde(rename = "Getting There")]
    GettingThere,
    #[serde(rename = "Consistency Star")]
    ConsistencyStar,
    #[serde(rename = "Hydration Pro")]
    HydrationPro,
    #[serde(rename = "Hydration Champion")]
    HydrationChampion,
}

impl Badge {
    pub fn for_streak(days: u32) -> Self {
        match days {
            30.. => Badge::HydrationChampion,
            14.. => Badge::HydrationPro,
            7.. => Badge::ConsistencyStar,
            3.. => Badge::GettingThere,
            _ => Badge::StartYourJourney,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::StartYourJourney => "Start Your Journey",
            Badge::GettingThere => "Getting There",
            Badge::ConsistencyStar => "Consistency Star",
            Badge::HydrationPro => "Hydration Pro",
            Badge::HydrationChampion => "Hydration Champion",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyInsight {
    pub total_ml: i64,
    pub average_ml: i64,
    pub completion_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyInsight {
    pub this_month_ml: i64,
    pub last_month_ml: i64,
    pub change_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationInsights {
    pub today_ml: i64,
    pub daily_goal_ml: i64,
    pub weekly: WeeklyInsight,
    pub monthly: MonthlyInsight,
    pub streak_days: u32,
    pub badge: Badge,
}

/// Per-date totals in the given offset
pub fn totals_by_date(logs: &[IntakeLog], offset: &FixedOffset) -> BTreeMap<NaiveDate, i64> {
    let mut totals = BTreeMap::new();
    for log in logs {
        *totals.entry(log.local_date(offset)).or_insert(0) += log.amount_ml;
    }
    totals
}

pub fn compute_insights(
    logs: &[IntakeLog],
    daily_goal_ml: i64,
    now: DateTime<FixedOffset>,
) -> HydrationInsights {
    let totals = totals_by_date(logs, now.offset());
    let today = now.date_naive();
    let streak_days = streak(&totals, daily_goal_ml, today);

    HydrationInsights {
        today_ml: totals.get(&today).copied().unwrap_or(0),
        daily_goal_ml,
        weekly: weekly(&totals, daily_goal_ml, today),
        monthly: monthly(&totals, today),
        streak_days,
        badge: Badge::for_streak(streak_days),
    }
}

fn weekly(totals: &BTreeMap<NaiveDate, i64>, goal: i64, today: NaiveDate) -> WeeklyInsight {
    let start = today - Duration::days(6);
    let total_ml: i64 = totals.range(start..=today).map(|(_, v)| v).sum();
    let average_ml = (total_ml as f64 / 7.0).round() as i64;
    let completion_percent = if goal > 0 {
        ((average_ml as f64 / goal as f64) * 100.0).round().min(100.0) as i64
    } else {
        0
    };

    WeeklyInsight {
        total_ml,
        average_ml,
        completion_percent,
    }
}

fn monthly(totals: &BTreeMap<NaiveDate, i64>, today: NaiveDate) -> MonthlyInsight {
    let this_start = today.with_day(1).unwrap_or(today);
    let last_end = this_start - Duration::days(1);
    let last_start = last_end.with_day(1).unwrap_or(last_end);

    let this_month_ml: i64 = totals.range(this_start..=today).map(|(_, v)| v).sum();
    let last_month_ml: i64 = totals.range(last_start..=last_end).map(|(_, v)| v).sum();

    MonthlyInsight {
        this_month_ml,
        last_month_ml,
        change_percent: percent_change(this_month_ml, last_month_ml),
    }
}

/// Rounded percent change from `previous` to `current`, 0 without a baseline
pub fn percent_change(current: i64, previous: i64) -> i64 {
    if previous == 0 {
        return 0;
    }
    ((current - previous) as f64 / previous as f64 * 100.0).round() as i64
}

/// Consecutive days meeting the goal, ending today or, when today is still
/// under goal, yesterday
pub fn streak(totals: &BTreeMap<NaiveDate, i64>, goal: i64, today: NaiveDate) -> u32 {
    if goal <= 0 {
        return 0;
    }
    let met = |day: &NaiveDate| totals.get(day).copied().unwrap_or(0) >= goal;

    let mut day = if met(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut count = 0;
    while met(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}
