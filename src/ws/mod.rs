//! WebSocket Module - realtime channel
//!
//! - HTTP upgrade on `/socket` (no authentication at upgrade time; a socket binds
//!   an identity later with the `authenticate` event)
//! - [`Hub`]: connection registry, rooms and presence
//! - [`broadcast`]: fan-out helpers used by the REST handlers
//! - [`event_handlers`]: client event dispatch

pub mod broadcast;
pub mod connection;
pub mod event_handlers;
pub mod hub;

pub use broadcast::{
    PresenceStatus, broadcast_activity, broadcast_notification, broadcast_presence,
    broadcast_project_update, project_update,
};
pub use connection::handle_socket;
pub use hub::{Hub, SocketId, project_room, user_room};

use crate::core::AppState;
use axum::{
    extract::{State, ws::WebSocketUpgrade},
    response::Response,
};
use std::sync::Arc;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}
