//! Route definitions for the Hydration Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod analytics;
mod health;
mod metrics;
mod profile;
mod reminder;
mod water;

pub use analytics::analytics_routes;
pub use profile::profile_routes;
pub use reminder::reminder_routes;
pub use water::water_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config().server.request_timeout_secs.max(1));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::render_metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Hydration Tracker API v1" }))
        .nest("/profile", profile::profile_routes())
        .nest("/water", water::water_routes())
        .nest("/analytics", analytics::analytics_routes())
        .nest("/reminder", reminder::reminder_routes())
}
