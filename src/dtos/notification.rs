//! Notification DTOs

use crate::entities::NotificationType;
use crate::repositories::RecordId;
use serde::Deserialize;
use super::{trimmed, trimmed_opt};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationDTO {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: RecordId,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub is_read: Option<bool>,
    pub project_id: Option<RecordId>,
}

#[derive(Deserialize, Debug, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationDTO {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1))]
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub is_read: Option<bool>,
    pub project_id: Option<RecordId>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub search: Option<String>,
    pub user_id: Option<RecordId>,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub is_read: Option<bool>,
    pub project_id: Option<RecordId>,
}
