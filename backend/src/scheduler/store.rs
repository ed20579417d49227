//! PostgreSQL-backed reminder store

use super::ReminderStore;
use crate::repositories::{IntakeRepository, ProfileRepository, ReminderRepository};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hydration_shared::models::IntakeLog;
use hydration_shared::reminder::ReminderConfig;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgReminderStore {
    pool: PgPool,
}

impl PgReminderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    /// Rows that fail to decode are logged and left out
    async fn active_reminders(&self) -> Result<Vec<ReminderConfig>> {
        let records = ReminderRepository::list_active(&self.pool).await?;
        let configs = records
            .into_iter()
            .filter_map(|record| {
                let user_id = record.user_id;
                match record.into_config() {
                    Ok(config) => Some(config),
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Skipping unreadable reminder");
                        None
                    }
                }
            })
            .collect();
        Ok(configs)
    }

    async fn intake_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IntakeLog>> {
        let records = IntakeRepository::list_between(&self.pool, user_id, from, to).await?;
        Ok(records.into_iter().map(IntakeLog::from).collect())
    }

    async fn daily_goal_ml(&self, user_id: Uuid) -> Result<Option<i64>> {
        ProfileRepository::daily_goal_ml(&self.pool, user_id).await
    }

    async fn save_reminder_state(&self, config: &ReminderConfig) -> Result<()> {
        ReminderRepository::save_state(
            &self.pool,
            config.user_id,
            config.paused_until,
            config.last_notified_at,
        )
        .await
    }
}
