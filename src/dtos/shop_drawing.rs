//! ShopDrawing DTOs

use crate::entities::DrawingStatus;
use crate::repositories::RecordId;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShopDrawingDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "projectId is required"))]
    pub project_id: RecordId,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "drawingNumber is required"))]
    pub drawing_number: String,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub revision: Option<String>,
    pub status: Option<DrawingStatus>,
    pub submitted_by: Option<RecordId>,
    pub reviewed_by: Option<RecordId>,
    pub file_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShopDrawingDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub drawing_number: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub revision: Option<String>,
    pub status: Option<DrawingStatus>,
    pub submitted_by: Option<RecordId>,
    pub reviewed_by: Option<RecordId>,
    pub file_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShopDrawingQuery {
    pub search: Option<String>,
    pub project_id: Option<RecordId>,
    pub status: Option<DrawingStatus>,
}
