use crate::repositories::StoreError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;

static EXPOSE_CAUSES: AtomicBool = AtomicBool::new(false);

/// Renders internal causes in the `error` field, set from `APP_ENV` when the
/// router is built. Off unless the environment is `development`.
pub fn expose_internal_causes(enabled: bool) {
    EXPOSE_CAUSES.store(enabled, Ordering::Relaxed);
}

/// Error envelope, the failure counterpart of `ApiResponse`
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: Cow<'static, str>,
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: Cow<'static, str>,
    details: Option<String>,
    /// Internal cause, only rendered in the development environment
    cause: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_cause(mut self, cause: impl std::fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    // Common error constructors
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Single translation point from store failures to HTTP semantics.
    /// `label` names the resource in the not-found message ("Project not found").
    pub fn from_store(err: StoreError, label: &str) -> Self {
        match err {
            StoreError::NotFound => Self::not_found(format!("{} not found", label)),
            StoreError::Conflict(details) => {
                Self::conflict(format!("{} already exists", label)).with_details(details)
            }
            StoreError::ForeignKey(details) => {
                Self::bad_request("Referenced record does not exist").with_details(details)
            }
            StoreError::Invalid(details) => {
                Self::bad_request("Invalid data").with_details(details)
            }
            StoreError::Unavailable => Self::service_unavailable("Database unavailable"),
            StoreError::Hashing(e) => {
                error!("Password hashing failed: {:?}", e);
                Self::internal_server_error("Internal server error").with_cause(e)
            }
            StoreError::Database(e) => {
                error!("Unclassified database error: {:?}", e);
                Self::internal_server_error("Internal server error").with_cause(e)
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_store(err, "Record")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid JSON body").with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query parameters").with_details(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("Invalid path parameters").with_details(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            success: false,
            message: self.message,
            details: self.details,
            error: self.cause.filter(|_| EXPOSE_CAUSES.load(Ordering::Relaxed)),
            timestamp: Utc::now(),
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_http_status() {
        let cases = [
            (StoreError::NotFound, StatusCode::NOT_FOUND),
            (StoreError::Conflict("users_email_key".into()), StatusCode::CONFLICT),
            (StoreError::ForeignKey("tasks_project_id_fkey".into()), StatusCode::BAD_REQUEST),
            (StoreError::Invalid("progress".into()), StatusCode::BAD_REQUEST),
            (StoreError::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Database(sqlx::Error::PoolClosed), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from_store(err, "Project").status(), expected);
        }
    }

    async fn rendered(err: AppError) -> serde_json::Value {
        let body = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_internal_cause_follows_environment() {
        let failure = || AppError::internal_server_error("Internal server error").with_cause("pool closed");

        expose_internal_causes(true);
        assert_eq!(rendered(failure()).await["error"], "pool closed");

        expose_internal_causes(false);
        let body = rendered(failure()).await;
        assert!(body.get("error").is_none());
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_not_found_message_uses_label() {
        let err = AppError::from_store(StoreError::NotFound, "Shop drawing");
        assert_eq!(err.message(), "Shop drawing not found");
    }
}
