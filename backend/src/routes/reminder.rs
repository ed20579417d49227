//! Reminder settings API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{ProfileService, ReminderService};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use chrono::Utc;
use hydration_shared::types::{
    PushTokenRequest, ReminderPreviewResponse, ReminderResponse, UpsertReminderRequest,
};

/// Create reminder routes
pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reminder).post(upsert_reminder))
        .route("/pause", put(toggle_pause))
        .route("/sleep", put(toggle_sleep))
        .route("/push-token", put(set_push_token))
        .route("/preview", get(preview_reminder))
}

/// GET /api/v1/reminder - 404 until the reminder is configured
async fn get_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReminderResponse>, ApiError> {
    let config = ReminderService::get(state.db(), auth.user_id).await?;
    Ok(Json(ReminderService::to_response(&config)))
}

/// POST /api/v1/reminder - Create with defaults or update
async fn upsert_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpsertReminderRequest>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let config = ReminderService::upsert(state.db(), auth.user_id, req).await?;
    Ok(Json(ReminderService::to_response(&config)))
}

/// PUT /api/v1/reminder/pause - Pause for the configured duration, or resume
async fn toggle_pause(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReminderResponse>, ApiError> {
    let config = ReminderService::toggle_pause(state.db(), auth.user_id, Utc::now()).await?;
    Ok(Json(ReminderService::to_response(&config)))
}

/// PUT /api/v1/reminder/sleep - Flip sleep mode
async fn toggle_sleep(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReminderResponse>, ApiError> {
    let config = ReminderService::toggle_sleep(state.db(), auth.user_id).await?;
    Ok(Json(ReminderService::to_response(&config)))
}

/// PUT /api/v1/reminder/push-token - Register the device token
async fn set_push_token(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PushTokenRequest>,
) -> Result<Json<ReminderResponse>, ApiError> {
    let config = ReminderService::set_push_token(state.db(), auth.user_id, req).await?;
    Ok(Json(ReminderService::to_response(&config)))
}

/// GET /api/v1/reminder/preview - What the scheduler would decide right now
async fn preview_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReminderPreviewResponse>, ApiError> {
    let goal_ml =
        ProfileService::reminder_goal_ml(state.db(), auth.user_id, state.default_goal_ml()).await?;
    let preview =
        ReminderService::preview(state.db(), auth.user_id, goal_ml, state.now_local()).await?;
    Ok(Json(preview))
}
