//! Hydration Tracker Backend
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Business logic over the pure `hydration_shared` domain code
//! - Repositories: Data access
//! - Scheduler: Background task that sends hydration reminders
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use hydration_backend::{
    config, db,
    notifications::{ExpoPushClient, LogOnlySender, PushSender},
    routes,
    scheduler::{PgReminderStore, ReminderScheduler, SystemClock},
    state::AppState,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        utc_offset = %config.scheduler.offset(),
        "Starting Hydration Tracker Backend"
    );

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Create database pool
    info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    // Run migrations (skip in production if using separate migration job)
    if !config::AppConfig::is_production() {
        db::run_migrations(&db_pool).await?;
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler_handle = if config.scheduler.enabled {
        let push: Arc<dyn PushSender> = if config.push.enabled {
            Arc::new(ExpoPushClient::from_config(&config.push)?)
        } else {
            warn!("Push delivery disabled, reminders will only be logged");
            Arc::new(LogOnlySender)
        };

        let scheduler = ReminderScheduler::new(
            Arc::new(PgReminderStore::new(db_pool.clone())),
            push,
            Arc::new(SystemClock),
            config.scheduler.offset(),
            config.scheduler.default_goal_ml,
            config.scheduler.tick_interval(),
        );
        Some(scheduler.spawn(shutdown_rx))
    } else {
        info!("Reminder scheduler disabled");
        None
    };

    // Create application state
    let state = AppState::new(db_pool, config.clone()).with_metrics(metrics_handle);

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the scheduler after the server has drained
    let _ = shutdown_tx.send(true);
    if let Some(handle) = scheduler_handle {
        if let Err(e) = handle.await {
            error!(error = %e, "Reminder scheduler task failed");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "hydration_backend=info,tower_http=info".into()
        } else {
            "hydration_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    // Check JWT secret is not default
    if config.jwt.secret.contains("development") || config.jwt.secret.len() < 32 {
        errors.push("JWT secret must be at least 32 characters and not contain 'development'");
    }

    // Check database URL is not localhost in production
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if config.scheduler.enabled && !config.push.enabled {
        warn!("Scheduler is enabled but push delivery is off");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
