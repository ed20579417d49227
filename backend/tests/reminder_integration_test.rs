//! Integration tests for reminder endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_reminder_missing_until_configured() {
    let app = common::TestApp::new().await;
    let user = app.user();

    let (status, _) = app.get_auth("/api/v1/reminder", &user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.put_auth("/api/v1/reminder/pause", "", &user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_upsert_creates_with_defaults() {
    let app = common::TestApp::new().await;
    let user = app.user();

    let (status, body) = app.post_auth("/api/v1/reminder", "{}", &user).await;

    assert_eq!(status, StatusCode::OK);
    let reminder: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(reminder["interval_minutes"], 30);
    assert_eq!(reminder["start_time"], "08:00");
    assert_eq!(reminder["end_time"], "22:00");
    assert_eq!(reminder["sleep_start"], "22:00");
    assert_eq!(reminder["sleep_end"], "06:00");
    assert_eq!(reminder["pause_duration_minutes"], 60);
    assert_eq!(reminder["is_paused"], false);
    assert_eq!(reminder["has_push_token"], false);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_toggles_and_push_token() {
    let app = common::TestApp::new().await;
    let user = app.user();

    let body = json!({ "interval_minutes": 45, "activity_level": "active" });
    app.post_auth("/api/v1/reminder", &body.to_string(), &user).await;

    let (_, body) = app.put_auth("/api/v1/reminder/pause", "", &user).await;
    let paused: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(paused["is_paused"], true);
    assert!(paused["paused_until"].is_string());

    let (_, body) = app.put_auth("/api/v1/reminder/pause", "", &user).await;
    let resumed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(resumed["is_paused"], false);

    let (_, body) = app.put_auth("/api/v1/reminder/sleep", "", &user).await;
    let sleeping: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sleeping["sleep_mode"], true);

    let token = json!({ "push_token": "ExponentPushToken[integration]" });
    let (status, body) = app
        .put_auth("/api/v1/reminder/push-token", &token.to_string(), &user)
        .await;
    assert_eq!(status, StatusCode::OK);
    let reminder: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(reminder["has_push_token"], true);
    assert_eq!(reminder["interval_minutes"], 45);
    assert_eq!(reminder["activity_level"], "active");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_invalid_time_rejected() {
    let app = common::TestApp::new().await;
    let user = app.user();

    let body = json!({ "start_time": "25:00" });
    let (status, body) = app.post_auth("/api/v1/reminder", &body.to_string(), &user).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["field"], "start_time");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preview_without_token_reports_gate() {
    let app = common::TestApp::new().await;
    let user = app.user();
    app.post_auth("/api/v1/reminder", "{}", &user).await;

    let (status, body) = app.get_auth("/api/v1/reminder/preview", &user).await;

    assert_eq!(status, StatusCode::OK);
    let preview: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(preview["gate"], "missing_token");
    assert!(preview["message"].is_null());
}
