//! Profile service
//!
//! Owns the invariant that the stored daily goal always matches the stored
//! calculator inputs: every write goes through [`UserProfile::update_inputs`].

use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use hydration_shared::goal::{calculate_goal, calculate_goal_ml, effective_goal_ml, reminder_goal_ml};
use hydration_shared::profile::{HydrationProfile, UserProfile};
use hydration_shared::types::{GoalResponse, ProfileResponse, UpdateProfileRequest};
use hydration_shared::units::VolumeUnit;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Profile service for business logic
pub struct ProfileService;

impl ProfileService {
    /// Stored profile, or an unsaved default one for new users
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let record = ProfileRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        match record {
            Some(record) => record.into_profile().map_err(ApiError::Internal),
            None => Ok(UserProfile::new(user_id, None, HydrationProfile::default())),
        }
    }

    /// Merge a partial update into the stored profile and recompute the goal
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        req.validate()?;

        let mut profile = Self::get(pool, user_id).await?;
        let mut inputs = profile.inputs().clone();
        req.apply_to(&mut inputs)?;

        let goal_changed = profile.update_inputs(|current| *current = inputs);
        if let Some(name) = req.display_name {
            let name = name.trim().to_string();
            profile.display_name = (!name.is_empty()).then_some(name);
        }

        ProfileRepository::upsert(pool, &profile)
            .await
            .map_err(ApiError::Internal)?;

        if goal_changed {
            info!(
                user_id = %user_id,
                daily_goal_ml = profile.daily_goal_ml(),
                "Daily goal recalculated"
            );
        }

        Ok(profile)
    }

    /// Goal used for progress, falling back to `default_goal_ml`
    pub async fn effective_goal_ml(
        pool: &PgPool,
        user_id: Uuid,
        default_goal_ml: i64,
    ) -> Result<i64, ApiError> {
        let stored = ProfileRepository::daily_goal_ml(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(effective_goal_ml(stored, default_goal_ml))
    }

    /// Goal reminder messages pace against, never below `default_goal_ml`
    pub async fn reminder_goal_ml(
        pool: &PgPool,
        user_id: Uuid,
        default_goal_ml: i64,
    ) -> Result<i64, ApiError> {
        let stored = ProfileRepository::daily_goal_ml(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(reminder_goal_ml(stored, default_goal_ml))
    }

    /// Preferred display unit, ml when the user has no profile
    pub async fn preferred_unit(pool: &PgPool, user_id: Uuid) -> Result<VolumeUnit, ApiError> {
        Ok(Self::get(pool, user_id).await?.inputs().preferred_unit)
    }

    /// Goal for a profile that is not stored
    pub fn preview_goal(req: &UpdateProfileRequest) -> Result<GoalResponse, ApiError> {
        req.validate()?;

        let mut inputs = HydrationProfile::default();
        req.apply_to(&mut inputs)?;

        Ok(GoalResponse {
            daily_goal_ml: calculate_goal_ml(&inputs),
            daily_goal: calculate_goal(&inputs),
            unit: inputs.preferred_unit.to_string(),
        })
    }

    pub fn to_response(profile: &UserProfile) -> ProfileResponse {
        ProfileResponse {
            user_id: profile.user_id,
            display_name: profile.display_name.clone(),
            inputs: profile.inputs().clone(),
            daily_goal_ml: profile.daily_goal_ml(),
            daily_goal: profile.display_goal(),
            unit: profile.inputs().preferred_unit.to_string(),
        }
    }

    pub fn to_goal_response(profile: &UserProfile) -> GoalResponse {
        GoalResponse {
            daily_goal_ml: profile.daily_goal_ml(),
            daily_goal: profile.display_goal(),
            unit: profile.inputs().preferred_unit.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_goal_matches_calculator() {
        let req = UpdateProfileRequest {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30),
            gender: Some("male".to_string()),
            activity_level: Some("moderate".to_string()),
            climate: Some("hot".to_string()),
            ..Default::default()
        };

        let goal = ProfileService::preview_goal(&req).unwrap();
        assert_eq!(goal.daily_goal_ml, 3673);
        assert_eq!(goal.daily_goal, 3673);
        assert_eq!(goal.unit, "ml");
    }

    #[test]
    fn test_preview_goal_in_ounces() {
        let req = UpdateProfileRequest {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(30),
            gender: Some("male".to_string()),
            activity_level: Some("moderate".to_string()),
            climate: Some("hot".to_string()),
            preferred_unit: Some("oz".to_string()),
            ..Default::default()
        };

        let goal = ProfileService::preview_goal(&req).unwrap();
        assert_eq!(goal.daily_goal_ml, 3673);
        assert_eq!(goal.daily_goal, 124);
        assert_eq!(goal.unit, "oz");
    }

    #[test]
    fn test_preview_goal_rejects_unknown_enum() {
        let req = UpdateProfileRequest {
            climate: Some("tropical-ish".to_string()),
            ..Default::default()
        };
        let err = ProfileService::preview_goal(&req).unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "climate"));
    }

    #[test]
    fn test_preview_goal_rejects_out_of_range() {
        let req = UpdateProfileRequest {
            weight_kg: Some(1.0),
            ..Default::default()
        };
        assert!(ProfileService::preview_goal(&req).is_err());
    }

    #[test]
    fn test_response_carries_display_goal() {
        let inputs = HydrationProfile {
            weight_kg: Some(60.0),
            preferred_unit: VolumeUnit::Oz,
            ..Default::default()
        };
        let profile = UserProfile::new(Uuid::new_v4(), Some("Asha".to_string()), inputs);
        let response = ProfileService::to_response(&profile);

        assert_eq!(response.daily_goal_ml, profile.daily_goal_ml());
        assert_eq!(response.daily_goal, profile.display_goal());
        assert_eq!(response.unit, "oz");
    }
}
