//! Response formatter - the JSON envelope shared by every HTTP route
//!
//! Successful responses are built with [`success_response`] or
//! [`paginated_response`]; failures go through [`error_response`] (or any other
//! [`AppError`]), whose `IntoResponse` renders the matching error envelope.

use crate::core::AppError;
use crate::dtos::Pagination;
use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total: u64) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: total_pages(total, pagination.limit),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
    pub timestamp: DateTime<Utc>,
}

/// An envelope paired with the status code it is sent with
pub struct Reply<B> {
    status: StatusCode,
    body: B,
}

impl<B> Reply<B> {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<B: Serialize> IntoResponse for Reply<B> {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `{ success: true, message, data, timestamp }`, sent with 200 unless
/// overridden through [`Reply::with_status`]
pub fn success_response<T: Serialize>(data: T, message: impl Into<String>) -> Reply<ApiResponse<T>> {
    Reply {
        status: StatusCode::OK,
        body: ApiResponse {
            success: true,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        },
    }
}

/// `{ success: false, message, details, timestamp }`
pub fn error_response(
    message: impl Into<String>,
    status: StatusCode,
    details: Option<String>,
) -> AppError {
    let err = AppError::new(status, message.into());
    match details {
        Some(details) => err.with_details(details),
        None => err,
    }
}

pub fn paginated_response<T: Serialize>(
    data: Vec<T>,
    pagination: Pagination,
    total: u64,
    message: impl Into<String>,
) -> Reply<PaginatedResponse<T>> {
    Reply {
        status: StatusCode::OK,
        body: PaginatedResponse {
            success: true,
            message: message.into(),
            data,
            pagination: PaginationMeta::new(pagination, total),
            timestamp: Utc::now(),
        },
    }
}

/// `ceil(total / limit)`; a zero limit never reaches here but yields 0 pages
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_total_pages_is_ceiling_of_total_over_limit() {
        let expected = [
            ((0, 1), 0),
            ((1, 1), 1),
            ((19, 1), 19),
            ((20, 1), 20),
            ((21, 1), 21),
            ((0, 20), 0),
            ((1, 20), 1),
            ((19, 20), 1),
            ((20, 20), 1),
            ((21, 20), 2),
            ((0, 100), 0),
            ((1, 100), 1),
            ((19, 100), 1),
            ((20, 100), 1),
            ((21, 100), 1),
        ];

        for ((total, limit), pages) in expected {
            assert_eq!(total_pages(total, limit), pages, "total={} limit={}", total, limit);
        }
    }

    #[tokio::test]
    async fn test_success_envelope_shape() {
        let response = success_response(serde_json::json!({"id": "1"}), "Fetched")
            .with_status(StatusCode::CREATED)
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Fetched");
        assert_eq!(body["data"]["id"], "1");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_error_envelope_shape() {
        let response = error_response("Missing field", StatusCode::BAD_REQUEST, None).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Missing field");
        assert!(body["details"].is_null());
        assert!(body["timestamp"].is_string());
    }

    #[test]
    fn test_pagination_meta_from_pagination() {
        let meta = PaginationMeta::new(Pagination { page: 2, limit: 20 }, 21);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.page, 2);
    }
}
