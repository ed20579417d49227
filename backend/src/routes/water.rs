//! Water intake API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{ExportService, IntakeService, ProfileService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use hydration_shared::types::{
    DailyIntakeResponse, HistoryQuery, HistoryResponse, IntakeLogResponse, LogIntakeRequest,
    UpdateIntakeRequest,
};
use uuid::Uuid;

/// Create water routes
pub fn water_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_intake))
        .route("/:id", put(update_intake).delete(delete_intake))
        .route("/daily", get(get_daily))
        .route("/history", get(get_history))
        .route("/history/export/csv", get(export_history_csv))
}

/// POST /api/v1/water - Log an intake entry
///
/// `amount` is read in `unit` (ml when absent) and stored in ml.
async fn log_intake(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogIntakeRequest>,
) -> Result<(StatusCode, Json<IntakeLogResponse>), ApiError> {
    let log = IntakeService::log(state.db(), auth.user_id, req, chrono::Utc::now()).await?;
    let unit = ProfileService::preferred_unit(state.db(), auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(IntakeService::to_response(&log, unit, &state.offset())),
    ))
}

/// PUT /api/v1/water/:id - Correct an entry's amount
async fn update_intake(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIntakeRequest>,
) -> Result<Json<IntakeLogResponse>, ApiError> {
    let log = IntakeService::update(state.db(), id, auth.user_id, req).await?;
    let unit = ProfileService::preferred_unit(state.db(), auth.user_id).await?;

    Ok(Json(IntakeService::to_response(&log, unit, &state.offset())))
}

/// DELETE /api/v1/water/:id
async fn delete_intake(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    IntakeService::delete(state.db(), id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/water/daily - Today's progress and entries
async fn get_daily(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DailyIntakeResponse>, ApiError> {
    let now = state.now_local();
    let profile = ProfileService::get(state.db(), auth.user_id).await?;
    let goal_ml =
        ProfileService::effective_goal_ml(state.db(), auth.user_id, state.default_goal_ml()).await?;
    let unit = profile.inputs().preferred_unit;

    let (summary, logs) = IntakeService::daily(state.db(), auth.user_id, goal_ml, now).await?;

    Ok(Json(DailyIntakeResponse {
        summary,
        logs: logs
            .iter()
            .map(|log| IntakeService::to_response(log, unit, now.offset()))
            .collect(),
    }))
}

/// GET /api/v1/water/history?from&to&page&limit
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let now = state.now_local();
    let unit = ProfileService::preferred_unit(state.db(), auth.user_id).await?;
    let goal_ml =
        ProfileService::effective_goal_ml(state.db(), auth.user_id, state.default_goal_ml()).await?;

    let history =
        IntakeService::history(state.db(), auth.user_id, &query, goal_ml, unit, now).await?;
    Ok(Json(history))
}

/// GET /api/v1/water/history/export/csv - Whole range as a CSV attachment
async fn export_history_csv(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let now = state.now_local();
    let unit = ProfileService::preferred_unit(state.db(), auth.user_id).await?;
    let csv = ExportService::history_csv(state.db(), auth.user_id, &query, unit, now).await?;

    let filename = ExportService::history_filename(&query, now.date_naive())?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid header value: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, csv))
}
