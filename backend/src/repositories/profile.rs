//! Profile repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hydration_shared::profile::{ActivityLevel, Climate, HydrationProfile, UserProfile};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub height_cm: Option<Decimal>,
    pub age_years: Option<i32>,
    pub gender: String,
    pub activity_level: Option<String>,
    pub climate: Option<String>,
    pub special_condition: String,
    pub pregnant: bool,
    pub breastfeeding: bool,
    pub lifestyle: String,
    pub preferred_unit: String,
    pub daily_goal_ml: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Rebuild the domain profile; the goal is recomputed from the inputs
    pub fn into_profile(self) -> Result<UserProfile> {
        let inputs = HydrationProfile {
            weight_kg: self.weight_kg.and_then(|d| d.to_f64()),
            height_cm: self.height_cm.and_then(|d| d.to_f64()),
            age_years: self.age_years,
            gender: self.gender.parse().context("stored gender")?,
            activity_level: self
                .activity_level
                .as_deref()
                .map(str::parse::<ActivityLevel>)
                .transpose()
                .context("stored activity level")?,
            climate: self
                .climate
                .as_deref()
                .map(str::parse::<Climate>)
                .transpose()
                .context("stored climate")?,
            special_condition: self
                .special_condition
                .parse()
                .context("stored special condition")?,
            pregnant: self.pregnant,
            breastfeeding: self.breastfeeding,
            lifestyle: self.lifestyle.parse().context("stored lifestyle")?,
            preferred_unit: self.preferred_unit.parse().context("stored unit")?,
        };
        Ok(UserProfile::new(self.user_id, self.display_name, inputs))
    }
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value
        .and_then(|v| Decimal::try_from(v).ok())
        .map(|d| d.round_dp(2))
}

const PROFILE_COLUMNS: &str = "user_id, display_name, weight_kg, height_cm, age_years, gender, \
     activity_level, climate, special_condition, pregnant, breastfeeding, lifestyle, \
     preferred_unit, daily_goal_ml, created_at, updated_at";

/// Profile repository
pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Insert or replace the profile, storing the goal it carries
    pub async fn upsert(pool: &PgPool, profile: &UserProfile) -> Result<ProfileRecord> {
        let inputs = profile.inputs();
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO user_profiles (
                user_id, display_name, weight_kg, height_cm, age_years, gender,
                activity_level, climate, special_condition, pregnant, breastfeeding,
                lifestyle, preferred_unit, daily_goal_ml
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                age_years = EXCLUDED.age_years,
                gender = EXCLUDED.gender,
                activity_level = EXCLUDED.activity_level,
                climate = EXCLUDED.climate,
                special_condition = EXCLUDED.special_condition,
                pregnant = EXCLUDED.pregnant,
                breastfeeding = EXCLUDED.breastfeeding,
                lifestyle = EXCLUDED.lifestyle,
                preferred_unit = EXCLUDED.preferred_unit,
                daily_goal_ml = EXCLUDED.daily_goal_ml,
                updated_at = NOW()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.user_id)
        .bind(&profile.display_name)
        .bind(to_decimal(inputs.weight_kg))
        .bind(to_decimal(inputs.height_cm))
        .bind(inputs.age_years)
        .bind(inputs.gender.as_str())
        .bind(inputs.activity_level.map(|a| a.as_str()))
        .bind(inputs.climate.map(|c| c.as_str()))
        .bind(inputs.special_condition.as_str())
        .bind(inputs.pregnant)
        .bind(inputs.breastfeeding)
        .bind(inputs.lifestyle.as_str())
        .bind(inputs.preferred_unit.abbreviation())
        .bind(profile.daily_goal_ml())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Stored goal for the scheduler, `None` without a profile
    pub async fn daily_goal_ml(pool: &PgPool, user_id: Uuid) -> Result<Option<i64>> {
        let goal = sqlx::query_scalar::<_, i64>(
            "SELECT daily_goal_ml FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(goal)
    }
}
