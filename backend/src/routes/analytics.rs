//! Analytics API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{AnalyticsService, ProfileService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use hydration_shared::analytics::{MonthlyAnalytics, TrendRange, WeeklyAnalytics};
use hydration_shared::types::{PerformanceResponse, StreakResponse, TrendQuery, TrendResponse};

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/weekly", get(get_weekly))
        .route("/monthly", get(get_monthly))
        .route("/streak", get(get_streak))
        .route("/performance", get(get_performance))
        .route("/trend", get(get_trend))
}

async fn goal_for(state: &AppState, auth: &AuthUser) -> Result<i64, ApiError> {
    ProfileService::effective_goal_ml(state.db(), auth.user_id, state.default_goal_ml()).await
}

/// GET /api/v1/analytics/weekly - Last seven days with percent of goal
async fn get_weekly(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WeeklyAnalytics>, ApiError> {
    let goal_ml = goal_for(&state, &auth).await?;
    let weekly = AnalyticsService::weekly(state.db(), auth.user_id, goal_ml, state.now_local()).await?;
    Ok(Json(weekly))
}

/// GET /api/v1/analytics/monthly - Rolling thirty-day totals
async fn get_monthly(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MonthlyAnalytics>, ApiError> {
    let monthly = AnalyticsService::monthly(state.db(), auth.user_id, state.now_local()).await?;
    Ok(Json(monthly))
}

/// GET /api/v1/analytics/streak - Consecutive days at goal and badge
async fn get_streak(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<StreakResponse>, ApiError> {
    let goal_ml = goal_for(&state, &auth).await?;
    let streak = AnalyticsService::streak(state.db(), auth.user_id, goal_ml, state.now_local()).await?;
    Ok(Json(streak))
}

/// GET /api/v1/analytics/performance - Seven-day goal completion
async fn get_performance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let goal_ml = goal_for(&state, &auth).await?;
    let performance =
        AnalyticsService::performance(state.db(), auth.user_id, goal_ml, state.now_local()).await?;
    Ok(Json(performance))
}

/// GET /api/v1/analytics/trend?range=week|month
async fn get_trend(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendResponse>, ApiError> {
    let range = query
        .range
        .as_deref()
        .map(str::parse::<TrendRange>)
        .transpose()
        .map_err(|msg| ApiError::invalid_field("range", msg))?
        .unwrap_or_default();
    let unit = ProfileService::preferred_unit(state.db(), auth.user_id).await?;

    let trend =
        AnalyticsService::trend(state.db(), auth.user_id, range, unit, state.now_local()).await?;
    Ok(Json(trend))
}
