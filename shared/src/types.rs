//! API request and response types

use crate::analytics::{DailySummary, DayGroup, TrendRange};
use crate::errors::ParseError;
use crate::insights::{Badge, HydrationInsights};
use crate::profile::{
    ActivityLevel, Climate, Gender, HydrationProfile, Lifestyle, SpecialCondition,
};
use crate::reminder::Gate;
use crate::units::VolumeUnit;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Profile
// ============================================================================

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[validate(range(min = 20.0, max = 500.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 50.0, max = 300.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[validate(range(min = 1, max = 150))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breastfeeding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_unit: Option<String>,
}

impl UpdateProfileRequest {
    /// Parse every present field and write it into `profile`.
    ///
    /// Nothing is written unless every field parses.
    pub fn apply_to(&self, profile: &mut HydrationProfile) -> Result<(), ParseError> {
        let gender = self.gender.as_deref().map(str::parse::<Gender>).transpose()?;
        let activity_level = self
            .activity_level
            .as_deref()
            .map(str::parse::<ActivityLevel>)
            .transpose()?;
        let climate = self.climate.as_deref().map(str::parse::<Climate>).transpose()?;
        let special_condition = self
            .special_condition
            .as_deref()
            .map(str::parse::<SpecialCondition>)
            .transpose()?;
        let lifestyle = self.lifestyle.as_deref().map(str::parse::<Lifestyle>).transpose()?;
        let preferred_unit = self
            .preferred_unit
            .as_deref()
            .map(str::parse::<VolumeUnit>)
            .transpose()?;

        if let Some(w) = self.weight_kg {
            profile.weight_kg = Some(w);
        }
        if let Some(h) = self.height_cm {
            profile.height_cm = Some(h);
        }
        if let Some(a) = self.age_years {
            profile.age_years = Some(a);
        }
        if let Some(g) = gender {
            profile.gender = g;
        }
        if activity_level.is_some() {
            profile.activity_level = activity_level;
        }
        if climate.is_some() {
            profile.climate = climate;
        }
        if let Some(c) = special_condition {
            profile.special_condition = c;
        }
        if let Some(p) = self.pregnant {
            profile.pregnant = p;
        }
        if let Some(b) = self.breastfeeding {
            profile.breastfeeding = b;
        }
        if let Some(l) = lifestyle {
            profile.lifestyle = l;
        }
        if let Some(u) = preferred_unit {
            profile.preferred_unit = u;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub inputs: HydrationProfile,
    pub daily_goal_ml: i64,
    pub daily_goal: i64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub daily_goal_ml: i64,
    pub daily_goal: i64,
    pub unit: String,
}

// ============================================================================
// Water intake
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogIntakeRequest {
    /// Amount in `unit`, milliliters when absent
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIntakeRequest {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeLogResponse {
    pub id: Uuid,
    pub amount_ml: i64,
    /// Amount in the user's preferred unit
    pub amount: f64,
    pub unit: String,
    pub logged_at: DateTime<Utc>,
    /// Local wall-clock time, `HH:MM`
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyIntakeResponse {
    #[serde(flatten)]
    pub summary: DailySummary,
    pub logs: Vec<IntakeLogResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub page: i64,
    pub limit: i64,
    pub total_logs: i64,
    pub total_pages: i64,
    pub logs: Vec<IntakeLogResponse>,
    pub daily_totals: Vec<DayGroup>,
    pub insights: HydrationInsights,
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendQuery {
    pub range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResponse {
    pub range: TrendRange,
    pub logs: Vec<IntakeLogResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakResponse {
    pub streak_days: u32,
    pub goal_ml: i64,
    pub badge: Badge,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub total_ml: i64,
    pub goal_ml: i64,
    pub percent: i64,
}

// ============================================================================
// Reminders
// ============================================================================

/// Create-or-update reminder settings; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpsertReminderRequest {
    #[validate(range(min = 1, max = 1440))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_end: Option<String>,
    #[validate(range(min = 1, max = 1440))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[validate(length(min = 1, max = 255))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PushTokenRequest {
    #[validate(length(min = 1, max = 255))]
    pub push_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub interval_minutes: u32,
    pub start_time: String,
    pub end_time: String,
    pub sleep_start: String,
    pub sleep_end: String,
    pub is_active: bool,
    pub is_paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_until: Option<DateTime<Utc>>,
    pub pause_duration_minutes: u32,
    pub sleep_mode: bool,
    pub activity_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_notified_at: Option<DateTime<Utc>>,
    pub has_push_token: bool,
}

/// What the scheduler would decide for this reminder right now
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderPreviewResponse {
    pub local_time: String,
    pub gate: Gate,
    pub in_active_window: bool,
    pub in_sleep_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
