use sitelink::monitoring::ProcessStats;
use sitelink::{AppState, Config, create_router, shutdown_signal};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sitelink=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.print_info();

    let addr = config.bind_address();
    let state = Arc::new(AppState::bootstrap(config).await);
    info!(mode = %state.mode, "Data mode selected");

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Server listening on http://{}", addr);

    let app = create_router(state.clone());
    let shutdown_state = state.clone();
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown_state.hub.close_all();
        })
        .await
    {
        error!("Server error: {}", e);
    }

    state.shutdown().await;
    info!("{}", ProcessStats::sample().format_for_log());
    info!("Server stopped");
}
