//! Reminder policy evaluation
//!
//! Decides whether a reminder fires at a given instant and which message it
//! carries. Gates are checked in order and the first closed gate wins:
//! missing delivery token, active pause, sleep window, interval not elapsed.
//! An expired pause is cleared in place and evaluation continues.

use crate::models::IntakeLog;
use crate::profile::ActivityLevel;
use crate::time_window::{DayWindow, TimeOfDay};
use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NOTIFICATION_TITLE: &str = "Hydration Reminder";

pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;
pub const DEFAULT_PAUSE_DURATION_MINUTES: u32 = 60;

pub const DEFAULT_ACTIVE_WINDOW: DayWindow = DayWindow::new(hm(8, 0), hm(22, 0));
pub const DEFAULT_SLEEP_WINDOW: DayWindow = DayWindow::new(hm(22, 0), hm(6, 0));

/// Fraction of expected-by-now intake below which the user is behind pace
const BEHIND_PACE_RATIO: f64 = 0.6;
/// Multiple of the interval after which the last drink counts as stale
const STALE_LOG_INTERVALS: f64 = 1.5;
/// Minutes into the day before an empty log is called out
const NO_LOG_GRACE_MINUTES: f64 = 120.0;

const fn hm(hour: u8, minute: u8) -> TimeOfDay {
    match TimeOfDay::from_hm(hour, minute) {
        Some(t) => t,
        None => TimeOfDay::MIDNIGHT,
    }
}

/// Per-user reminder policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub user_id: Uuid,
    pub interval_minutes: u32,
    pub active_window: DayWindow,
    pub sleep_window: DayWindow,
    pub is_active: bool,
    pub pause_duration_minutes: u32,
    pub paused_until: Option<DateTime<Utc>>,
    pub sleep_mode: bool,
    pub activity_level: ActivityLevel,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub push_token: Option<String>,
}

impl ReminderConfig {
    /// A fresh, active config with the creation defaults
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            active_window: DEFAULT_ACTIVE_WINDOW,
            sleep_window: DEFAULT_SLEEP_WINDOW,
            is_active: true,
            pause_duration_minutes: DEFAULT_PAUSE_DURATION_MINUTES,
            paused_until: None,
            sleep_mode: false,
            activity_level: ActivityLevel::default(),
            last_notified_at: None,
            push_token: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_until.is_some()
    }

    /// Pause for the configured duration starting at `now`
    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.paused_until =
            Some(now + Duration::minutes(i64::from(self.pause_duration_minutes)));
    }

    pub fn resume(&mut self) {
        self.paused_until = None;
    }

    /// Flip the pause state, returning whether the reminder is now paused
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause(now);
        }
        self.is_paused()
    }

    /// Flip sleep mode, returning the new value
    pub fn toggle_sleep_mode(&mut self) -> bool {
        self.sleep_mode = !self.sleep_mode;
        self.sleep_mode
    }

    pub fn has_push_token(&self) -> bool {
        self.push_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Earliest instant the interval gate opens again
    pub fn next_eligible_at(&self) -> Option<DateTime<Utc>> {
        self.last_notified_at
            .map(|last| last + Duration::minutes(i64::from(self.interval_minutes)))
    }

    pub fn mark_notified(&mut self, now: DateTime<Utc>) {
        self.last_notified_at = Some(now);
    }
}

/// Which gate closed, or `Open` when the reminder may fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    MissingToken,
    Paused,
    Sleeping,
    TooSoon,
    Open,
}

impl Gate {
    pub fn is_open(&self) -> bool {
        matches!(self, Gate::Open)
    }
}

/// Result of running the gates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateCheck {
    pub gate: Gate,
    /// An expired pause was cleared while checking
    pub pause_cleared: bool,
}

/// Notification body variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderMessage {
    TimeToDrink,
    BehindPace,
    BeenAWhile,
    NoLogsYet,
    HighActivity,
}

impl ReminderMessage {
    pub fn text(&self) -> &'static str {
        match self {
            ReminderMessage::TimeToDrink => "Time to drink water",
            ReminderMessage::BehindPace => "You're behind your hydration pace. Drink now!",
            ReminderMessage::BeenAWhile => "It has been a while since your last drink",
            ReminderMessage::NoLogsYet => "No water logged yet today. Start hydrating",
            ReminderMessage::HighActivity => "High activity detected. Stay hydrated now!",
        }
    }
}

impl std::fmt::Display for ReminderMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Outcome of a full evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDecision {
    pub fire: bool,
    pub gate: Gate,
    pub message: Option<ReminderMessage>,
    pub pause_cleared: bool,
}

/// Run the four gates against `now`, clearing an expired pause in place
pub fn check_gates(config: &mut ReminderConfig, now: DateTime<FixedOffset>) -> GateCheck {
    let now_utc = now.with_timezone(&Utc);
    let mut pause_cleared = false;

    if !config.has_push_token() {
        return GateCheck {
            gate: Gate::MissingToken,
            pause_cleared,
        };
    }

    if let Some(until) = config.paused_until {
        if until <= now_utc {
            config.resume();
            pause_cleared = true;
        } else {
            return GateCheck {
                gate: Gate::Paused,
                pause_cleared,
            };
        }
    }

    if config.sleep_mode && config.sleep_window.contains(TimeOfDay::from(&now)) {
        return GateCheck {
            gate: Gate::Sleeping,
            pause_cleared,
        };
    }

    if let Some(next) = config.next_eligible_at() {
        if now_utc < next {
            return GateCheck {
                gate: Gate::TooSoon,
                pause_cleared,
            };
        }
    }

    GateCheck {
        gate: Gate::Open,
        pause_cleared,
    }
}

/// Pick the message for a reminder that is about to fire
///
/// Only logs on the local calendar day of `now` are considered, in any order.
pub fn compose_message(
    config: &ReminderConfig,
    now: DateTime<FixedOffset>,
    logs: &[IntakeLog],
    daily_goal_ml: i64,
) -> ReminderMessage {
    if config.activity_level.is_high() {
        return ReminderMessage::HighActivity;
    }

    let offset = now.offset();
    let today = now.date_naive();
    let todays: Vec<&IntakeLog> = logs
        .iter()
        .filter(|log| log.local_date(offset) == today)
        .collect();

    let total: i64 = todays.iter().map(|log| log.amount_ml).sum();
    let elapsed = minutes_since_midnight(&now).max(1.0);
    let expected = expected_by_now(daily_goal_ml, elapsed);

    let now_utc = now.with_timezone(&Utc);
    let latest = todays.iter().map(|log| log.logged_at).max();

    match latest {
        Some(latest)
            if fractional_minutes(now_utc - latest)
                >= STALE_LOG_INTERVALS * f64::from(config.interval_minutes) =>
        {
            ReminderMessage::BeenAWhile
        }
        None if elapsed > NO_LOG_GRACE_MINUTES => ReminderMessage::NoLogsYet,
        _ if (total as f64) < expected as f64 * BEHIND_PACE_RATIO => ReminderMessage::BehindPace,
        _ => ReminderMessage::TimeToDrink,
    }
}

/// Full evaluation: gates, then message selection
pub fn should_notify(
    config: &mut ReminderConfig,
    now: DateTime<FixedOffset>,
    recent_logs: &[IntakeLog],
    daily_goal_ml: i64,
) -> ReminderDecision {
    let check = check_gates(config, now);
    if !check.gate.is_open() {
        return ReminderDecision {
            fire: false,
            gate: check.gate,
            message: None,
            pause_cleared: check.pause_cleared,
        };
    }

    ReminderDecision {
        fire: true,
        gate: Gate::Open,
        message: Some(compose_message(config, now, recent_logs, daily_goal_ml)),
        pause_cleared: check.pause_cleared,
    }
}

/// Intake expected by `elapsed` minutes into the day, capped at the goal
pub fn expected_by_now(daily_goal_ml: i64, elapsed_minutes: f64) -> i64 {
    let expected = (daily_goal_ml as f64 * elapsed_minutes / 1440.0).round() as i64;
    expected.min(daily_goal_ml)
}

fn minutes_since_midnight(now: &DateTime<FixedOffset>) -> f64 {
    f64::from(now.num_seconds_from_midnight()) / 60.0
}

fn fractional_minutes(elapsed: Duration) -> f64 {
    elapsed.num_seconds() as f64 / 60.0
}
