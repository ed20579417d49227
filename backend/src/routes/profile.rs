//! Hydration profile API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use hydration_shared::types::{GoalResponse, ProfileResponse, UpdateProfileRequest};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/goal", get(get_goal))
        .route("/goal/calculate", post(calculate_goal))
}

/// GET /api/v1/profile - Stored profile, defaults for new users
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::get(state.db(), auth.user_id).await?;
    Ok(Json(ProfileService::to_response(&profile)))
}

/// PUT /api/v1/profile - Partial upsert; the daily goal is recomputed
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::update(state.db(), auth.user_id, req).await?;
    Ok(Json(ProfileService::to_response(&profile)))
}

/// GET /api/v1/profile/goal - Daily goal in ml and in the preferred unit
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<GoalResponse>, ApiError> {
    let profile = ProfileService::get(state.db(), auth.user_id).await?;
    Ok(Json(ProfileService::to_goal_response(&profile)))
}

/// POST /api/v1/profile/goal/calculate - Goal for unsaved inputs
async fn calculate_goal(
    _auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    Ok(Json(ProfileService::preview_goal(&req)?))
}
