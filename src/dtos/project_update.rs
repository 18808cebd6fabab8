//! ProjectUpdate DTOs

use crate::entities::UpdateType;
use crate::repositories::RecordId;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectUpdateDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "projectId is required"))]
    pub project_id: RecordId,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    pub update_type: Option<UpdateType>,
    /// Defaults to the requesting user
    pub author_id: Option<RecordId>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectUpdateDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub content: Option<String>,
    pub update_type: Option<UpdateType>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdateQuery {
    pub search: Option<String>,
    pub project_id: Option<RecordId>,
    pub update_type: Option<UpdateType>,
}
