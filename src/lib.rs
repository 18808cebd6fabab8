//! SiteLink server library - exposes the application for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod monitoring;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-exports of the main types
pub use core::{AppError, AppState, Config, DataMode};

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use entities::{
    Activity, Client, MaterialSpec, Notification, ProcurementItem, Project, ProjectUpdate,
    ShopDrawing, Task, TeamMember, User,
};
use services::{RestResource, append_only_routes, mount_path, resource_routes};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::demo_user_middleware;
    use services::{banner, fallback, health, method_not_allowed};
    use ws::ws_handler;

    let cors = cors_layer(&state.config.cors_origin);
    crate::core::error::expose_internal_causes(state.config.is_development());

    Router::new()
        .route("/api", get(banner))
        .route("/health", get(health))
        .route("/socket", any(ws_handler))
        .merge(configure_api_routes())
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            demo_user_middleware,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `/api/v1/*` for every resource
fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest(&mount_path(User::KIND), resource_routes::<User>())
        .nest(&mount_path(Project::KIND), resource_routes::<Project>())
        .nest(&mount_path(Task::KIND), resource_routes::<Task>())
        .nest(&mount_path(Client::KIND), resource_routes::<Client>())
        .nest(&mount_path(TeamMember::KIND), resource_routes::<TeamMember>())
        .nest(&mount_path(Notification::KIND), resource_routes::<Notification>())
        .nest(&mount_path(ShopDrawing::KIND), resource_routes::<ShopDrawing>())
        .nest(&mount_path(MaterialSpec::KIND), resource_routes::<MaterialSpec>())
        .nest(&mount_path(Activity::KIND), append_only_routes::<Activity>())
        .nest(&mount_path(ProjectUpdate::KIND), resource_routes::<ProjectUpdate>())
        .nest(&mount_path(ProcurementItem::KIND), resource_routes::<ProcurementItem>())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => layer.allow_origin(value).allow_credentials(true),
        _ => layer.allow_origin(AnyOrigin),
    }
}

/// Turns a handler panic into a 500 error envelope
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "Unknown panic".to_string());
    error!(details = %details, "Handler panicked");

    AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        .with_cause(details)
        .into_response()
}

/// Resolves on Ctrl-C. When the handler cannot be installed the server keeps
/// running instead of stopping right after startup.
pub async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_signal_resolves_shutdown() {
        let done = timeout(Duration::from_millis(200), wait_for_signal(async { Ok(()) })).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_signal_registration_failure_keeps_serving() {
        let failing = async { Err(std::io::Error::other("signal handler unavailable")) };
        let done = timeout(Duration::from_millis(200), wait_for_signal(failing)).await;
        assert!(done.is_err());
    }
}
