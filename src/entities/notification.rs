//! Notification entity

use super::enums::NotificationType;
use crate::dtos::{CreateNotificationDTO, NotificationQuery, UpdateNotificationDTO};
use crate::repositories::filter::{Conditions, eq_matches, opt_eq_matches, text_matches};
use crate::repositories::{RecordId, Resource, StoreError, patch, patch_opt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Postgres;
use sqlx::query_builder::Separated;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    /// Recipient
    pub user_id: RecordId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub is_read: bool,
    pub project_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Notification {
    type Create = CreateNotificationDTO;
    type Update = UpdateNotificationDTO;
    type Filter = NotificationQuery;

    const TABLE: &'static str = "notifications";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "user_id",
        "title",
        "message",
        "notification_type",
        "is_read",
        "project_id",
        "created_at",
        "updated_at",
    ];
    const SORT_COLUMN: &'static str = "created_at";
    const LABEL: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn build(
        id: RecordId,
        data: CreateNotificationDTO,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            user_id: data.user_id,
            title: data.title,
            message: data.message,
            notification_type: data.notification_type.unwrap_or_default(),
            is_read: data.is_read.unwrap_or(false),
            project_id: data.project_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, data: UpdateNotificationDTO, now: DateTime<Utc>) {
        patch(&mut self.title, data.title);
        patch(&mut self.message, data.message);
        patch(&mut self.notification_type, data.notification_type);
        patch(&mut self.is_read, data.is_read);
        patch_opt(&mut self.project_id, data.project_id);
        self.updated_at = now;
    }

    fn matches(&self, filter: &NotificationQuery) -> bool {
        text_matches(
            filter.search.as_deref(),
            &[Some(self.title.as_str()), Some(self.message.as_str())],
        ) && eq_matches(filter.user_id.as_deref(), self.user_id.as_str())
            && eq_matches(filter.notification_type.as_ref(), &self.notification_type)
            && eq_matches(filter.is_read.as_ref(), &self.is_read)
            && opt_eq_matches(filter.project_id.as_deref(), self.project_id.as_deref())
    }

    fn push_filters(filter: &NotificationQuery, conditions: &mut Conditions<'_, '_>) {
        conditions.search(&["title", "message"], filter.search.as_deref());
        conditions.eq("user_id", filter.user_id.clone());
        conditions.eq("notification_type", filter.notification_type);
        conditions.eq("is_read", filter.is_read);
        conditions.eq("project_id", filter.project_id.clone());
    }

    fn bind_values<'args>(self, row: &mut Separated<'_, 'args, Postgres, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.user_id)
            .push_bind(self.title)
            .push_bind(self.message)
            .push_bind(self.notification_type)
            .push_bind(self.is_read)
            .push_bind(self.project_id)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
