//! Demo identity - every request runs as the same static user
//!
//! Authentication is not part of this service: the middleware below only
//! injects the demo user into the request extensions so handlers can stamp
//! `createdBy`/`authorId` fields and attribute activity.

use crate::core::AppState;
use crate::entities::UserRole;
use axum::{
    body::Body,
    extract::{Request, State},
    http::Response,
    middleware::Next,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Matches user `1` of the demo fixtures
    pub fn demo() -> Self {
        Self {
            id: "1".to_string(),
            email: "demo@sitelink.dev".to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Admin,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub async fn demo_user_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response<Body> {
    trace!(user_id = %state.demo_user.id, "Injecting demo user");
    req.extensions_mut().insert(state.demo_user.clone());
    next.run(req).await
}
