//! Reminder settings service
//!
//! The reminder row is created on the first configuration request and is
//! never deleted; pause and sleep toggles require it to exist.

use crate::error::ApiError;
use crate::repositories::ReminderRepository;
use crate::services::intake::IntakeService;
use chrono::{DateTime, FixedOffset, Utc};
use hydration_shared::profile::ActivityLevel;
use hydration_shared::reminder::{check_gates, compose_message, ReminderConfig};
use hydration_shared::time_window::{DayWindow, TimeOfDay};
use hydration_shared::types::{
    PushTokenRequest, ReminderPreviewResponse, ReminderResponse, UpsertReminderRequest,
};
use hydration_shared::validation::validate_push_token;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct ReminderService;

impl ReminderService {
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<ReminderConfig>, ApiError> {
        ReminderRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|record| record.into_config().map_err(ApiError::Internal))
            .transpose()
    }

    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<ReminderConfig, ApiError> {
        Self::find(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Reminder not configured".to_string()))
    }

    /// Create with defaults or update the present fields
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        req: UpsertReminderRequest,
    ) -> Result<ReminderConfig, ApiError> {
        req.validate()?;

        let existing = Self::find(pool, user_id).await?;
        let created = existing.is_none();
        let mut config = existing.unwrap_or_else(|| ReminderConfig::new(user_id));
        apply_upsert(&mut config, &req)?;

        let saved = Self::save(pool, &config).await?;
        info!(
            user_id = %user_id,
            created,
            interval_minutes = saved.interval_minutes,
            "Reminder settings saved"
        );
        Ok(saved)
    }

    /// Flip pause; pausing lasts the configured duration from `now`
    pub async fn toggle_pause(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ReminderConfig, ApiError> {
        let mut config = Self::get(pool, user_id).await?;
        let paused = config.toggle_pause(now);

        let saved = Self::save(pool, &config).await?;
        info!(user_id = %user_id, paused, paused_until = ?saved.paused_until, "Reminder pause toggled");
        Ok(saved)
    }

    pub async fn toggle_sleep(pool: &PgPool, user_id: Uuid) -> Result<ReminderConfig, ApiError> {
        let mut config = Self::get(pool, user_id).await?;
        let sleep_mode = config.toggle_sleep_mode();

        let saved = Self::save(pool, &config).await?;
        info!(user_id = %user_id, sleep_mode, "Reminder sleep mode toggled");
        Ok(saved)
    }

    /// Store the device token, creating the reminder with defaults if needed
    pub async fn set_push_token(
        pool: &PgPool,
        user_id: Uuid,
        req: PushTokenRequest,
    ) -> Result<ReminderConfig, ApiError> {
        req.validate()?;
        validate_push_token(&req.push_token)
            .map_err(|msg| ApiError::invalid_field("push_token", msg))?;

        let mut config = Self::find(pool, user_id)
            .await?
            .unwrap_or_else(|| ReminderConfig::new(user_id));
        config.push_token = Some(req.push_token.trim().to_string());

        Self::save(pool, &config).await
    }

    /// What the scheduler would do for this user at `now`, without side effects
    pub async fn preview(
        pool: &PgPool,
        user_id: Uuid,
        goal_ml: i64,
        now: DateTime<FixedOffset>,
    ) -> Result<ReminderPreviewResponse, ApiError> {
        let config = Self::get(pool, user_id).await?;
        let mut probe = config.clone();
        let check = check_gates(&mut probe, now);

        let message = if check.gate.is_open() {
            let logs = IntakeService::recent(pool, user_id, 1, now).await?;
            Some(compose_message(&probe, now, &logs, goal_ml).to_string())
        } else {
            None
        };

        let local = TimeOfDay::from(&now);
        Ok(ReminderPreviewResponse {
            local_time: local.to_string(),
            gate: check.gate,
            in_active_window: config.active_window.contains(local),
            in_sleep_window: config.sleep_window.contains(local),
            next_eligible_at: probe.next_eligible_at(),
            message,
        })
    }

    pub fn to_response(config: &ReminderConfig) -> ReminderResponse {
        ReminderResponse {
            interval_minutes: config.interval_minutes,
            start_time: config.active_window.start.to_string(),
            end_time: config.active_window.end.to_string(),
            sleep_start: config.sleep_window.start.to_string(),
            sleep_end: config.sleep_window.end.to_string(),
            is_active: config.is_active,
            is_paused: config.is_paused(),
            paused_until: config.paused_until,
            pause_duration_minutes: config.pause_duration_minutes,
            sleep_mode: config.sleep_mode,
            activity_level: config.activity_level.to_string(),
            last_notified_at: config.last_notified_at,
            has_push_token: config.has_push_token(),
        }
    }

    async fn save(pool: &PgPool, config: &ReminderConfig) -> Result<ReminderConfig, ApiError> {
        ReminderRepository::upsert(pool, config)
            .await
            .map_err(ApiError::Internal)?
            .into_config()
            .map_err(ApiError::Internal)
    }
}

/// Merge the present request fields into `config`.
///
/// Every field is parsed before anything is written.
pub fn apply_upsert(config: &mut ReminderConfig, req: &UpsertReminderRequest) -> Result<(), ApiError> {
    let time = |field: &str, value: &Option<String>| -> Result<Option<TimeOfDay>, ApiError> {
        value
            .as_deref()
            .map(|v| {
                v.parse::<TimeOfDay>()
                    .map_err(|e| ApiError::invalid_field(field, e.to_string()))
            })
            .transpose()
    };

    let start = time("start_time", &req.start_time)?;
    let end = time("end_time", &req.end_time)?;
    let sleep_start = time("sleep_start", &req.sleep_start)?;
    let sleep_end = time("sleep_end", &req.sleep_end)?;
    let activity_level = req
        .activity_level
        .as_deref()
        .map(str::parse::<ActivityLevel>)
        .transpose()?;
    if let Some(token) = req.push_token.as_deref() {
        validate_push_token(token).map_err(|msg| ApiError::invalid_field("push_token", msg))?;
    }

    if let Some(interval) = req.interval_minutes {
        config.interval_minutes = interval;
    }
    if let Some(duration) = req.pause_duration_minutes {
        config.pause_duration_minutes = duration;
    }
    config.active_window = DayWindow::new(
        start.unwrap_or(config.active_window.start),
        end.unwrap_or(config.active_window.end),
    );
    config.sleep_window = DayWindow::new(
        sleep_start.unwrap_or(config.sleep_window.start),
        sleep_end.unwrap_or(config.sleep_window.end),
    );
    if let Some(active) = req.is_active {
        config.is_active = active;
    }
    if let Some(level) = activity_level {
        config.activity_level = level;
    }
    if let Some(token) = req.push_token.as_deref() {
        config.push_token = Some(token.trim().to_string());
    }
    Ok(())
}
