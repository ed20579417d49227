//! Analytics service: chart series, streak and weekly performance

use crate::error::ApiError;
use crate::services::intake::IntakeService;
use chrono::{DateTime, FixedOffset};
use hydration_shared::analytics::{
    monthly_analytics, performance_percent, weekly_analytics, MonthlyAnalytics, TrendRange,
    WeeklyAnalytics,
};
use hydration_shared::insights::{compute_insights, Badge, INSIGHTS_LOOKBACK_DAYS};
use hydration_shared::types::{PerformanceResponse, StreakResponse, TrendResponse};
use hydration_shared::units::VolumeUnit;
use sqlx::PgPool;
use uuid::Uuid;

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn weekly(
        pool: &PgPool,
        user_id: Uuid,
        goal_ml: i64,
        now: DateTime<FixedOffset>,
    ) -> Result<WeeklyAnalytics, ApiError> {
        let logs = IntakeService::recent(pool, user_id, 7, now).await?;
        Ok(weekly_analytics(&logs, goal_ml, now.date_naive(), now.offset()))
    }

    pub async fn monthly(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<MonthlyAnalytics, ApiError> {
        let logs = IntakeService::recent(pool, user_id, 30, now).await?;
        Ok(monthly_analytics(&logs, now.date_naive(), now.offset()))
    }

    pub async fn streak(
        pool: &PgPool,
        user_id: Uuid,
        goal_ml: i64,
        now: DateTime<FixedOffset>,
    ) -> Result<StreakResponse, ApiError> {
        let logs = IntakeService::recent(pool, user_id, INSIGHTS_LOOKBACK_DAYS, now).await?;
        let insights = compute_insights(&logs, goal_ml, now);

        Ok(StreakResponse {
            streak_days: insights.streak_days,
            goal_ml,
            badge: Badge::for_streak(insights.streak_days),
        })
    }

    /// Share of the last seven days' goal that was met
    pub async fn performance(
        pool: &PgPool,
        user_id: Uuid,
        goal_ml: i64,
        now: DateTime<FixedOffset>,
    ) -> Result<PerformanceResponse, ApiError> {
        let logs = IntakeService::recent(pool, user_id, 7, now).await?;
        let total_ml: i64 = logs.iter().map(|log| log.amount_ml).sum();

        Ok(PerformanceResponse {
            total_ml,
            goal_ml,
            percent: performance_percent(total_ml, goal_ml),
        })
    }

    /// Raw entries for the chosen range, oldest first
    pub async fn trend(
        pool: &PgPool,
        user_id: Uuid,
        range: TrendRange,
        unit: VolumeUnit,
        now: DateTime<FixedOffset>,
    ) -> Result<TrendResponse, ApiError> {
        let logs = IntakeService::recent(pool, user_id, range.days(), now).await?;

        Ok(TrendResponse {
            range,
            logs: logs
                .iter()
                .map(|log| IntakeService::to_response(log, unit, now.offset()))
                .collect(),
        })
    }
}
