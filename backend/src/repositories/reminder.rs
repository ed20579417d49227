//! Reminder repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use hydration_shared::reminder::ReminderConfig;
use hydration_shared::time_window::{DayWindow, TimeOfDay};
use sqlx::PgPool;
use uuid::Uuid;

/// Reminder record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReminderRecord {
    pub user_id: Uuid,
    pub interval_minutes: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub sleep_start: NaiveTime,
    pub sleep_end: NaiveTime,
    pub is_active: bool,
    pub pause_duration_minutes: i32,
    pub paused_until: Option<DateTime<Utc>>,
    pub sleep_mode: bool,
    pub activity_level: String,
    pub last_notified_at: Option<DateTime<Utc>>,
    pub push_token: Option<String>,
}

impl ReminderRecord {
    pub fn into_config(self) -> Result<ReminderConfig> {
        Ok(ReminderConfig {
            user_id: self.user_id,
            interval_minutes: u32::try_from(self.interval_minutes.max(1))?,
            active_window: DayWindow::new(
                TimeOfDay::from(&self.start_time),
                TimeOfDay::from(&self.end_time),
            ),
            sleep_window: DayWindow::new(
                TimeOfDay::from(&self.sleep_start),
                TimeOfDay::from(&self.sleep_end),
            ),
            is_active: self.is_active,
            pause_duration_minutes: u32::try_from(self.pause_duration_minutes.max(1))?,
            paused_until: self.paused_until,
            sleep_mode: self.sleep_mode,
            activity_level: self
                .activity_level
                .parse()
                .context("stored reminder activity level")?,
            last_notified_at: self.last_notified_at,
            push_token: self.push_token,
        })
    }
}

const REMINDER_COLUMNS: &str = "user_id, interval_minutes, start_time, end_time, sleep_start, \
     sleep_end, is_active, pause_duration_minutes, paused_until, sleep_mode, activity_level, \
     last_notified_at, push_token";

fn minutes_to_i32(minutes: u32) -> i32 {
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Reminder repository
pub struct ReminderRepository;

impl ReminderRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<ReminderRecord>> {
        let record = sqlx::query_as::<_, ReminderRecord>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Insert or replace every user-editable column
    pub async fn upsert(pool: &PgPool, config: &ReminderConfig) -> Result<ReminderRecord> {
        let record = sqlx::query_as::<_, ReminderRecord>(&format!(
            r#"
            INSERT INTO reminders (
                user_id, interval_minutes, start_time, end_time, sleep_start, sleep_end,
                is_active, pause_duration_minutes, paused_until, sleep_mode, activity_level,
                last_notified_at, push_token
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id) DO UPDATE SET
                interval_minutes = EXCLUDED.interval_minutes,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                sleep_start = EXCLUDED.sleep_start,
                sleep_end = EXCLUDED.sleep_end,
                is_active = EXCLUDED.is_active,
                pause_duration_minutes = EXCLUDED.pause_duration_minutes,
                paused_until = EXCLUDED.paused_until,
                sleep_mode = EXCLUDED.sleep_mode,
                activity_level = EXCLUDED.activity_level,
                last_notified_at = EXCLUDED.last_notified_at,
                push_token = EXCLUDED.push_token,
                updated_at = NOW()
            RETURNING {REMINDER_COLUMNS}
            "#
        ))
        .bind(config.user_id)
        .bind(minutes_to_i32(config.interval_minutes))
        .bind(config.active_window.start.to_naive_time())
        .bind(config.active_window.end.to_naive_time())
        .bind(config.sleep_window.start.to_naive_time())
        .bind(config.sleep_window.end.to_naive_time())
        .bind(config.is_active)
        .bind(minutes_to_i32(config.pause_duration_minutes))
        .bind(config.paused_until)
        .bind(config.sleep_mode)
        .bind(config.activity_level.as_str())
        .bind(config.last_notified_at)
        .bind(&config.push_token)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Active reminders, in a stable order
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ReminderRecord>> {
        let records = sqlx::query_as::<_, ReminderRecord>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE is_active ORDER BY user_id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Persist what the scheduler changes: pause clearing and last notification
    pub async fn save_state(
        pool: &PgPool,
        user_id: Uuid,
        paused_until: Option<DateTime<Utc>>,
        last_notified_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET paused_until = $2, last_notified_at = $3, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(paused_until)
        .bind(last_notified_at)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_record_into_config() {
        let record = ReminderRecord {
            user_id: Uuid::new_v4(),
            interval_minutes: 45,
            start_time: t(8, 0),
            end_time: t(22, 0),
            sleep_start: t(23, 0),
            sleep_end: t(7, 30),
            is_active: true,
            pause_duration_minutes: 60,
            paused_until: None,
            sleep_mode: true,
            activity_level: "very_active".to_string(),
            last_notified_at: None,
            push_token: Some("ExponentPushToken[abc]".to_string()),
        };
        let config = record.into_config().unwrap();
        assert_eq!(config.interval_minutes, 45);
        assert_eq!(config.sleep_window.to_string(), "23:00-07:30");
        assert!(config.activity_level.is_high());
        assert!(config.has_push_token());
    }
}
