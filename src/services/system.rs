//! Service endpoints outside `/api/v1`: banner, health and the 404/405 fallbacks

use super::mount_path;
use crate::core::response::{ApiResponse, Reply};
use crate::core::{AppError, AppState, success_response};
use crate::entities::ResourceKind;
use crate::monitoring::ProcessStats;
use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

pub const SERVICE_NAME: &str = "SiteLink API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `GET /api`
pub async fn banner(State(state): State<Arc<AppState>>) -> Reply<ApiResponse<Value>> {
    let resources: Vec<String> = ResourceKind::iter().map(mount_path).collect();
    success_response(
        json!({
            "name": SERVICE_NAME,
            "version": VERSION,
            "mode": state.mode,
            "resources": resources,
            "realtime": "/socket",
        }),
        format!("{} is running", SERVICE_NAME),
    )
}

/// `GET /health`
#[instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> Reply<ApiResponse<Value>> {
    let stats = ProcessStats::sample();
    debug!("{}", stats.format_for_log());

    success_response(
        json!({
            "status": "healthy",
            "mode": state.mode,
            "database": if state.database_connected() { "connected" } else { "disconnected" },
            "timestamp": Utc::now(),
            "server": {
                "uptime": state.uptime().as_secs(),
                "memory": stats,
                "platform": stats.platform,
                "version": VERSION,
                "connections": {
                    "sockets": state.hub.connection_count(),
                    "onlineUsers": state.hub.online_users(),
                },
            },
        }),
        "Server is healthy",
    )
}

/// Unknown routes
pub async fn fallback(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route {} not found", uri.path()))
}

/// Known routes hit with a method they do not serve
pub async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("Method {} not allowed on {}", method, uri.path()),
    )
}
