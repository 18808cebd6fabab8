//! WebSocket Event Handlers - one function per client event
//!
//! Handlers never close the socket: failures are reported back to the sender
//! as an `error`, `authentication_error` or `notification_error` frame.

use super::broadcast::{PresenceStatus, broadcast_activity, broadcast_notification, broadcast_presence};
use super::hub::{SocketId, project_room};
use crate::core::AppState;
use crate::dtos::ws_event::{
    AuthenticatePayload, ProjectRoomPayload, SendNotificationPayload, TypingPayload,
    UpdateDataPayload,
};
use crate::dtos::{ActivityEvent, ClientEvent, ServerEvent};
use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
#[error("{event}: {message}")]
pub struct EventError {
    /// Name of the frame sent back
    pub event: &'static str,
    pub message: String,
}

impl EventError {
    fn new(event: &'static str, message: impl Into<String>) -> Self {
        Self {
            event,
            message: message.into(),
        }
    }

    fn unauthenticated() -> Self {
        Self::new("error", "Not authenticated")
    }
}

/// Parses one text frame and runs the matching handler
#[instrument(skip(state, text), fields(socket_id = %socket))]
pub fn process_frame(state: &AppState, socket: SocketId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Malformed frame: {}", e);
            state.hub.emit_to(
                socket,
                &ServerEvent::error("error", &format!("Malformed event: {}", e)),
            );
            return;
        }
    };

    let name = event.name();
    debug!(event = name, "Frame received");
    if let Err(err) = dispatch(state, socket, event) {
        warn!(event = name, "Event rejected: {}", err);
        state
            .hub
            .emit_to(socket, &ServerEvent::error(err.event, &err.message));
    }
}

fn dispatch(state: &AppState, socket: SocketId, event: ClientEvent) -> Result<(), EventError> {
    match event {
        ClientEvent::Authenticate(payload) => authenticate(state, socket, payload),
        ClientEvent::JoinProject(payload) => join_project(state, socket, payload),
        ClientEvent::LeaveProject(payload) => leave_project(state, socket, payload),
        ClientEvent::UpdateData(payload) => update_data(state, socket, payload),
        ClientEvent::SendNotification(payload) => send_notification(state, socket, payload),
        ClientEvent::TypingStart(payload) => typing(state, socket, payload, true),
        ClientEvent::TypingStop(payload) => typing(state, socket, payload, false),
    }
}

fn require_user(state: &AppState, socket: SocketId) -> Result<String, EventError> {
    state
        .hub
        .user_of(socket)
        .ok_or_else(EventError::unauthenticated)
}

fn authenticate(
    state: &AppState,
    socket: SocketId,
    payload: AuthenticatePayload,
) -> Result<(), EventError> {
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(EventError::new("authentication_error", "userId is required"));
    }

    let auth = state
        .hub
        .authenticate(socket, user_id, payload.user_data.clone());

    if let Some(previous) = auth.previous.filter(|p| p.went_offline) {
        broadcast_presence(
            &state.hub,
            &previous.user_id,
            PresenceStatus::Offline,
            None,
            Some(socket),
        );
    }

    state.hub.emit_to(
        socket,
        &ServerEvent::new(
            "authenticated",
            json!({
                "userId": user_id,
                "socketId": socket,
                "timestamp": Utc::now(),
            }),
        ),
    );

    if auth.came_online {
        broadcast_presence(
            &state.hub,
            user_id,
            PresenceStatus::Online,
            Some(&payload.user_data),
            Some(socket),
        );
    }
    info!(user_id, "Socket authenticated");
    Ok(())
}

fn join_project(
    state: &AppState,
    socket: SocketId,
    payload: ProjectRoomPayload,
) -> Result<(), EventError> {
    let user_id = require_user(state, socket)?;
    let room = project_room(&payload.project_id);
    let newly_joined = state.hub.join(socket, &room);

    state.hub.emit_to(
        socket,
        &ServerEvent::new(
            "joined_project",
            json!({ "projectId": payload.project_id, "timestamp": Utc::now() }),
        ),
    );

    if newly_joined {
        let user_data = state
            .hub
            .connection(socket)
            .map(|c| c.user_data)
            .unwrap_or(Value::Null);
        state.hub.emit_room(
            &room,
            &ServerEvent::new(
                "user_joined_project",
                json!({
                    "userId": user_id,
                    "userData": user_data,
                    "projectId": payload.project_id,
                    "timestamp": Utc::now(),
                }),
            ),
            Some(socket),
        );
    }
    Ok(())
}

fn leave_project(
    state: &AppState,
    socket: SocketId,
    payload: ProjectRoomPayload,
) -> Result<(), EventError> {
    let user_id = require_user(state, socket)?;
    let room = project_room(&payload.project_id);
    let was_member = state.hub.leave(socket, &room);

    state.hub.emit_to(
        socket,
        &ServerEvent::new(
            "left_project",
            json!({ "projectId": payload.project_id, "timestamp": Utc::now() }),
        ),
    );

    if was_member {
        state.hub.emit_room(
            &room,
            &ServerEvent::new(
                "user_left_project",
                json!({
                    "userId": user_id,
                    "projectId": payload.project_id,
                    "timestamp": Utc::now(),
                }),
            ),
            None,
        );
    }
    Ok(())
}

/// Relays `{type}_updated` to the project room (or everyone else when the
/// change has no project) and records it as activity
fn update_data(
    state: &AppState,
    socket: SocketId,
    payload: UpdateDataPayload,
) -> Result<(), EventError> {
    let user_id = require_user(state, socket)?;

    let event = ServerEvent::new(
        payload.kind.updated_event(),
        json!({
            "type": payload.kind,
            "resourceId": payload.resource_id,
            "projectId": payload.project_id,
            "updates": payload.updates,
            "updatedBy": user_id,
            "timestamp": Utc::now(),
        }),
    );
    let reached = match &payload.project_id {
        Some(project_id) => state
            .hub
            .emit_room(&project_room(project_id), &event, Some(socket)),
        None => state.hub.emit_all(&event, Some(socket)),
    };
    debug!(reached, "Data update relayed");

    let activity = ActivityEvent::new("updated", payload.kind, payload.resource_id)
        .in_project(payload.project_id)
        .by(user_id)
        .with_metadata(payload.updates);
    broadcast_activity(&state.hub, &activity);
    Ok(())
}

fn send_notification(
    state: &AppState,
    socket: SocketId,
    payload: SendNotificationPayload,
) -> Result<(), EventError> {
    let sender = require_user(state, socket)?;
    let Some(target) = payload.target_user_id.filter(|t| !t.trim().is_empty()) else {
        return Err(EventError::new(
            "notification_error",
            "targetUserId is required",
        ));
    };

    let mut notification = payload.notification;
    if let Value::Object(fields) = &mut notification {
        fields.entry("senderId").or_insert(json!(sender));
        fields.entry("timestamp").or_insert(json!(Utc::now()));
    }
    let reached = broadcast_notification(&state.hub, &notification, Some(&target));
    debug!(reached, target = %target, "Notification relayed");
    Ok(())
}

fn typing(
    state: &AppState,
    socket: SocketId,
    payload: TypingPayload,
    is_typing: bool,
) -> Result<(), EventError> {
    let user_id = require_user(state, socket)?;
    state.hub.emit_room(
        &project_room(&payload.project_id),
        &ServerEvent::new(
            "user_typing",
            json!({
                "userId": user_id,
                "projectId": payload.project_id,
                "location": payload.location,
                "isTyping": is_typing,
            }),
        ),
        Some(socket),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::ws::hub::SocketSignal;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn connect(state: &AppState) -> (SocketId, UnboundedReceiver<SocketSignal>) {
        let (tx, rx) = unbounded_channel();
        (state.hub.register(tx), rx)
    }

    fn frames(rx: &mut UnboundedReceiver<SocketSignal>) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(SocketSignal::Event(frame)) = rx.try_recv() {
            out.push(serde_json::from_str(frame.as_str()).unwrap());
        }
        out
    }

    fn names(frames: &[Value]) -> Vec<&str> {
        frames.iter().map(|f| f["event"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_malformed_frame_answers_error() {
        let state = AppState::demo(Config::default());
        let (socket, mut rx) = connect(&state);
        process_frame(&state, socket, "{not json");
        process_frame(&state, socket, r#"{"event":"self_destruct","data":{}}"#);
        assert_eq!(names(&frames(&mut rx)), ["error", "error"]);
    }

    #[test]
    fn test_room_events_require_authentication() {
        let state = AppState::demo(Config::default());
        let (socket, mut rx) = connect(&state);
        process_frame(&state, socket, r#"{"event":"join_project","data":{"projectId":"1"}}"#);
        let received = frames(&mut rx);
        assert_eq!(names(&received), ["error"]);
        assert_eq!(received[0]["data"]["message"], "Not authenticated");
        assert_eq!(state.hub.room_size("project:1"), 0);
    }

    #[test]
    fn test_empty_user_id_is_an_authentication_error() {
        let state = AppState::demo(Config::default());
        let (socket, mut rx) = connect(&state);
        process_frame(&state, socket, r#"{"event":"authenticate","data":{"userId":""}}"#);
        assert_eq!(names(&frames(&mut rx)), ["authentication_error"]);
    }

    #[test]
    fn test_authenticate_announces_presence_once() {
        let state = AppState::demo(Config::default());
        let (first, mut rx_first) = connect(&state);
        let (second, mut rx_second) = connect(&state);
        let (observer, mut rx_observer) = connect(&state);
        let _ = observer;

        process_frame(&state, first, r#"{"event":"authenticate","data":{"userId":"5"}}"#);
        process_frame(&state, second, r#"{"event":"authenticate","data":{"userId":5}}"#);

        assert_eq!(names(&frames(&mut rx_first)), ["authenticated"]);
        let second_frames = frames(&mut rx_second);
        assert_eq!(names(&second_frames), ["user_presence", "authenticated"]);
        assert_eq!(names(&frames(&mut rx_observer)), ["user_presence"]);
    }

    #[test]
    fn test_join_update_and_typing_flow() {
        let state = AppState::demo(Config::default());
        let (alice, mut rx_alice) = connect(&state);
        let (bob, mut rx_bob) = connect(&state);
        process_frame(&state, alice, r#"{"event":"authenticate","data":{"userId":"1"}}"#);
        process_frame(&state, bob, r#"{"event":"authenticate","data":{"userId":"2"}}"#);
        process_frame(&state, alice, r#"{"event":"join_project","data":{"projectId":"1"}}"#);
        process_frame(&state, bob, r#"{"event":"join_project","data":{"projectId":1}}"#);
        frames(&mut rx_alice);
        frames(&mut rx_bob);

        process_frame(
            &state,
            bob,
            r#"{"event":"update_data","data":{"type":"task","resourceId":"3","projectId":"1","updates":{"status":"completed"}}}"#,
        );
        let alice_frames = frames(&mut rx_alice);
        assert_eq!(
            names(&alice_frames),
            ["task_updated", "activity_update", "global_activity_update"]
        );
        assert_eq!(alice_frames[0]["data"]["updatedBy"], "2");
        assert_eq!(
            names(&frames(&mut rx_bob)),
            ["activity_update", "global_activity_update"]
        );

        process_frame(
            &state,
            alice,
            r#"{"event":"typing_start","data":{"projectId":"1","location":"task-3"}}"#,
        );
        let bob_frames = frames(&mut rx_bob);
        assert_eq!(names(&bob_frames), ["user_typing"]);
        assert_eq!(bob_frames[0]["data"]["isTyping"], true);
        assert!(frames(&mut rx_alice).is_empty());
    }

    #[test]
    fn test_send_notification_needs_target() {
        let state = AppState::demo(Config::default());
        let (alice, mut rx_alice) = connect(&state);
        let (bob, mut rx_bob) = connect(&state);
        process_frame(&state, alice, r#"{"event":"authenticate","data":{"userId":"1"}}"#);
        process_frame(&state, bob, r#"{"event":"authenticate","data":{"userId":"2"}}"#);
        frames(&mut rx_alice);
        frames(&mut rx_bob);

        process_frame(
            &state,
            alice,
            r#"{"event":"send_notification","data":{"notification":{"title":"Hi"}}}"#,
        );
        assert_eq!(names(&frames(&mut rx_alice)), ["notification_error"]);

        process_frame(
            &state,
            alice,
            r#"{"event":"send_notification","data":{"targetUserId":"2","notification":{"title":"Hi"}}}"#,
        );
        let received = frames(&mut rx_bob);
        assert_eq!(names(&received), ["notification_received"]);
        assert_eq!(received[0]["data"]["senderId"], "1");
        assert_eq!(received[0]["data"]["title"], "Hi");
    }
}
