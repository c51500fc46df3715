use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dreamboard_advisor::{Advisor, AdvisorConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dreamboard_api::auth::session::SessionStore;
use dreamboard_api::background::enrichment::{EnrichmentQueue, EnrichmentWorker};
use dreamboard_api::background::session_cleanup;
use dreamboard_api::config::ServerConfig;
use dreamboard_api::router::build_app_router;
use dreamboard_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dreamboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let advisor_config = AdvisorConfig::from_env();
    if !advisor_config.is_enabled() {
        tracing::warn!("OPENAI_API_KEY not set, AI suggestions will use fallbacks");
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = dreamboard_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    dreamboard_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    dreamboard_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Background workers ---
    let cancel = CancellationToken::new();

    let advisor = Advisor::from_config(advisor_config).expect("Failed to build advisor client");
    let (enrichment, enrichment_rx) = EnrichmentQueue::channel(config.enrichment_queue_capacity);
    let worker = EnrichmentWorker::new(pool.clone(), advisor);
    let worker_handle = tokio::spawn(worker.run(enrichment_rx, cancel.clone()));

    let cleanup_handle = tokio::spawn(session_cleanup::run(pool.clone(), cancel.clone()));
    tracing::info!(
        queue_capacity = config.enrichment_queue_capacity,
        "Background workers started (enrichment, session cleanup)"
    );

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        sessions: SessionStore::new(pool, config.session.clone()),
        enrichment,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), worker_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Background workers stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
