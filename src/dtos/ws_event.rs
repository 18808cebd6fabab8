//! WebSocket Event DTOs
//!
//! Every frame, in both directions, is a JSON object `{ "event": ..., "data": ... }`.
//! Incoming frames deserialize into [`ClientEvent`]; outgoing frames are built
//! as [`ServerEvent`] and serialized once, whatever the number of recipients.

use crate::entities::{Activity, NotificationType, ResourceKind};
use crate::repositories::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Identifiers arrive either as strings or as bare JSON numbers
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Authenticate(AuthenticatePayload),
    JoinProject(ProjectRoomPayload),
    LeaveProject(ProjectRoomPayload),
    UpdateData(UpdateDataPayload),
    SendNotification(SendNotificationPayload),
    TypingStart(TypingPayload),
    TypingStop(TypingPayload),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authenticate(_) => "authenticate",
            Self::JoinProject(_) => "join_project",
            Self::LeaveProject(_) => "leave_project",
            Self::UpdateData(_) => "update_data",
            Self::SendNotification(_) => "send_notification",
            Self::TypingStart(_) => "typing_start",
            Self::TypingStop(_) => "typing_stop",
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatePayload {
    #[serde(default, deserialize_with = "id")]
    pub user_id: String,
    #[serde(default)]
    pub user_data: Value,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoomPayload {
    #[serde(deserialize_with = "id")]
    pub project_id: RecordId,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDataPayload {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default, deserialize_with = "opt_id")]
    pub resource_id: Option<RecordId>,
    #[serde(default, deserialize_with = "opt_id")]
    pub project_id: Option<RecordId>,
    #[serde(default)]
    pub updates: Value,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationPayload {
    #[serde(default, deserialize_with = "opt_id")]
    pub target_user_id: Option<RecordId>,
    #[serde(default)]
    pub notification: Value,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    #[serde(deserialize_with = "id")]
    pub project_id: RecordId,
    #[serde(default)]
    pub location: Option<String>,
}

/// Outgoing frame
#[derive(Serialize, Debug, Clone)]
pub struct ServerEvent {
    pub event: String,
    pub data: Value,
}

impl ServerEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// `error`, `authentication_error` and `notification_error` frames
    pub fn error(event: &str, message: &str) -> Self {
        Self::new(
            event,
            json!({ "message": message, "timestamp": Utc::now() }),
        )
    }
}

/// Payload of `activity_update` / `global_activity_update`
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    /// Set when the activity was persisted
    pub id: Option<RecordId>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
    pub description: Option<String>,
    pub metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(action: &str, kind: ResourceKind, entity_id: Option<RecordId>) -> Self {
        Self {
            id: None,
            action: action.to_string(),
            entity_type: kind.to_string(),
            entity_id,
            project_id: None,
            user_id: None,
            description: None,
            metadata: None,
            timestamp: Utc::now(),
        }
    }

    pub fn in_project(mut self, project_id: Option<RecordId>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn by(mut self, user_id: impl Into<RecordId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl From<&Activity> for ActivityEvent {
    fn from(activity: &Activity) -> Self {
        Self {
            id: Some(activity.id.clone()),
            action: activity.action.clone(),
            entity_type: activity.entity_type.clone(),
            entity_id: activity.entity_id.clone(),
            project_id: activity.project_id.clone(),
            user_id: activity.user_id.clone(),
            description: activity.description.clone(),
            metadata: activity.metadata.clone(),
            timestamp: activity.created_at,
        }
    }
}

/// Notification pushed without a stored record behind it
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub project_id: Option<RecordId>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_parse_authenticate_with_numeric_id() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"authenticate","data":{"userId":42,"userData":{"name":"Ann"}}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::Authenticate(payload) => {
                assert_eq!(payload.user_id, "42");
                assert_eq!(payload.user_data["name"], "Ann");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_data() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"update_data","data":{"type":"shop_drawing","resourceId":"5","projectId":1,"updates":{"status":"approved"}}}"#,
        )
        .unwrap();
        let ClientEvent::UpdateData(payload) = event else {
            panic!("expected update_data");
        };
        assert_eq!(payload.kind, ResourceKind::ShopDrawing);
        assert_eq!(payload.project_id.as_deref(), Some("1"));
        assert_eq!(payload.updates["status"], "approved");
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"explode","data":{}}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
    }

    #[test]
    fn test_activity_event_shape() {
        let event = ActivityEvent::new("created", ResourceKind::Project, Some("9".into()))
            .in_project(Some("9".into()))
            .by("1");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["entityType"], "project");
        assert_eq!(json["projectId"], "9");
        assert_eq!(json["userId"], "1");
    }
}
