//! Realtime broadcaster - fan-out of domain events to connected clients.
//!
//! Fire-and-forget: each function returns how many sockets were reached and
//! nothing is queued for users who are offline.

use super::hub::{Hub, SocketId, project_room, user_room};
use crate::dtos::{ActivityEvent, ServerEvent};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// `project_updated` payload types
pub mod project_update {
    pub const UPDATED: &str = "updated";
    pub const DELETED: &str = "deleted";
    pub const UPDATE_POSTED: &str = "update_posted";
}

/// `notification_received` to the user's room, or to every socket when no
/// target is given
#[instrument(skip(hub, notification))]
pub fn broadcast_notification<N: Serialize>(
    hub: &Hub,
    notification: &N,
    target_user_id: Option<&str>,
) -> usize {
    let data = match serde_json::to_value(notification) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to serialize notification: {:?}", e);
            return 0;
        }
    };
    let event = ServerEvent::new("notification_received", data);
    let reached = match target_user_id {
        Some(user_id) => hub.emit_room(&user_room(user_id), &event, None),
        None => hub.emit_all(&event, None),
    };
    debug!(reached, "Notification broadcast");
    reached
}

/// `activity_update` to the project room (when the activity has a project)
/// plus `global_activity_update` to everyone
#[instrument(skip(hub, activity), fields(action = %activity.action, entity_type = %activity.entity_type))]
pub fn broadcast_activity(hub: &Hub, activity: &ActivityEvent) -> usize {
    let data = match serde_json::to_value(activity) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to serialize activity: {:?}", e);
            return 0;
        }
    };

    let mut reached = 0;
    if let Some(project_id) = &activity.project_id {
        let event = ServerEvent::new("activity_update", data.clone());
        reached += hub.emit_room(&project_room(project_id), &event, None);
    }
    reached += hub.emit_all(&ServerEvent::new("global_activity_update", data), None);

    debug!(reached, "Activity broadcast");
    reached
}

/// `project_updated` to the project room only
#[instrument(skip(hub, data))]
pub fn broadcast_project_update(hub: &Hub, project_id: &str, update_type: &str, data: Value) -> usize {
    let event = ServerEvent::new(
        "project_updated",
        json!({
            "type": update_type,
            "data": data,
            "timestamp": Utc::now(),
        }),
    );
    let reached = hub.emit_room(&project_room(project_id), &event, None);
    debug!(reached, "Project update broadcast");
    reached
}

/// `user_presence` to every socket but the one that caused it
pub fn broadcast_presence(
    hub: &Hub,
    user_id: &str,
    status: PresenceStatus,
    user_data: Option<&Value>,
    except: Option<SocketId>,
) -> usize {
    let event = ServerEvent::new(
        "user_presence",
        json!({
            "userId": user_id,
            "status": status,
            "userData": user_data,
            "timestamp": Utc::now(),
        }),
    );
    hub.emit_all(&event, except)
}
