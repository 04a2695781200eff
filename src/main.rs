// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use serial_dash::application::streaming_service::StreamingDashboardService;
use serial_dash::infrastructure::config::{load_dashboard_config, load_server_config};
use serial_dash::presentation::app_state::AppState;
use serial_dash::presentation::handlers::{
    get_dashboard, health_check, ingest_telemetry, stream_dashboard,
};
use serial_dash::{Dashboard, DashboardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let server_config = load_server_config()?;
    // The dashboard borrows its configuration for the life of the process.
    let dashboard_config: &'static DashboardConfig = Box::leak(Box::new(load_dashboard_config()?));

    let dashboard = Dashboard::new(dashboard_config)?;
    tracing::info!(
        "Compact frame needs {} bytes, {} telemetry-bound datasets",
        dashboard.estimate_size(),
        dashboard.slots().len()
    );

    let state = Arc::new(AppState {
        streaming_service: StreamingDashboardService::new(dashboard),
        settings: server_config.server.clone(),
    });

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/telemetry", post(ingest_telemetry))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = server_config.server.bind.parse()?;
    tracing::info!("Starting serial-dash service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
