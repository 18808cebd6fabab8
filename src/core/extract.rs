//! Request extractors whose rejections render as error envelopes

use crate::core::AppError;
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use axum_macros::FromRequestParts;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

lazy_static! {
    static ref UUID_ID: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$"
    )
    .expect("valid uuid pattern");
    static ref NUMERIC_ID: Regex = Regex::new(r"^[0-9]+$").expect("valid numeric pattern");
}

/// Accepts RFC 4122 identifiers (versions 1-5) and bare digit strings, the
/// latter being the identifiers used by the demo fixtures.
pub fn is_valid_record_id(id: &str) -> bool {
    UUID_ID.is_match(id) || NUMERIC_ID.is_match(id)
}

/// `Query<T>` with a 400 envelope on malformed query strings
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// `Json<T>` followed by `validator` checks; both failures are 400
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(|e| {
            warn!("Request body failed validation: {}", e);
            AppError::from(e)
        })?;
        Ok(Self(value))
    }
}

/// The `:id` path segment, checked before any store access
#[derive(Debug, Clone)]
pub struct RecordIdPath(pub String);

impl<S> FromRequestParts<S> for RecordIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        if !is_valid_record_id(&id) {
            warn!(id = %id, "Rejected malformed record id");
            return Err(AppError::bad_request("Invalid ID format")
                .with_details("Expected a UUID or a numeric identifier"));
        }
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_uuid_and_numeric_ids() {
        let valid = [
            "1",
            "42",
            "000123",
            "550e8400-e29b-41d4-a716-446655440000",
            "6BA7B810-9DAD-11D1-80B4-00C04FD430C8",
            "f47ac10b-58cc-4372-a567-0e02b2c3d479",
        ];
        for id in valid {
            assert!(is_valid_record_id(id), "{} should be accepted", id);
        }
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let invalid = [
            "",
            "abc",
            "12a",
            "-1",
            "1.5",
            " 1",
            "550e8400e29b41d4a716446655440000",
            "550e8400-e29b-61d4-a716-446655440000",
            "550e8400-e29b-41d4-c716-446655440000",
            "550e8400-e29b-41d4-a716-44665544000g",
            "'; DROP TABLE projects; --",
        ];
        for id in invalid {
            assert!(!is_valid_record_id(id), "{:?} should be rejected", id);
        }
    }
}
