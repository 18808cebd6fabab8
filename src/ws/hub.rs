//! Hub - connection registry, rooms and presence
//!
//! Four maps, all keyed for O(1) access from the socket tasks:
//! - `sockets`: every open socket and the rooms it joined
//! - `rooms`: room name to member sockets
//! - `connections`: identity of authenticated sockets
//! - `user_sockets`: user id to that user's live sockets (presence index)
//!
//! No guard on one map is held while another map is touched, and frames are
//! sent only after member ids have been collected.

use crate::dtos::ServerEvent;
use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

pub type SocketId = Uuid;

/// Messages for a socket's writer task
#[derive(Debug)]
pub enum SocketSignal {
    /// Serialized frame, shared between all recipients
    Event(Utf8Bytes),
    Shutdown,
}

pub fn user_room(user_id: &str) -> String {
    format!("user:{}", user_id)
}

pub fn project_room(project_id: &str) -> String {
    format!("project:{}", project_id)
}

struct SocketHandle {
    tx: UnboundedSender<SocketSignal>,
    rooms: HashSet<String>,
}

/// Identity bound to a socket by `authenticate`
#[derive(Debug, Clone)]
pub struct SocketConnection {
    pub user_id: String,
    pub user_data: Value,
    pub connected_at: DateTime<Utc>,
}

/// A socket lost its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub user_id: String,
    /// The user has no live socket left
    pub went_offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// Set when the socket was authenticated as someone else before
    pub previous: Option<Departure>,
    /// First live socket of this user
    pub came_online: bool,
}

#[derive(Default)]
pub struct Hub {
    sockets: DashMap<SocketId, SocketHandle>,
    rooms: DashMap<String, HashSet<SocketId>>,
    connections: DashMap<SocketId, SocketConnection>,
    user_sockets: DashMap<String, HashSet<SocketId>>,
}

fn encode(event: &ServerEvent) -> Option<Utf8Bytes> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Utf8Bytes::from(json)),
        Err(e) => {
            error!(event = %event.event, "Failed to serialize event: {:?}", e);
            None
        }
    }
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, tx: UnboundedSender<SocketSignal>) -> SocketId {
        let socket = Uuid::new_v4();
        self.sockets.insert(
            socket,
            SocketHandle {
                tx,
                rooms: HashSet::new(),
            },
        );
        info!(socket_id = %socket, total = self.sockets.len(), "Socket registered");
        socket
    }

    /// Binds `user_id` to the socket, adds it to the presence index and joins
    /// the user's personal room
    #[instrument(skip(self, user_data))]
    pub fn authenticate(&self, socket: SocketId, user_id: &str, user_data: Value) -> Authentication {
        let same_user = self
            .connections
            .get(&socket)
            .is_some_and(|c| c.user_id == user_id);
        let previous = if same_user {
            None
        } else {
            self.detach_identity(socket)
        };

        self.connections.insert(
            socket,
            SocketConnection {
                user_id: user_id.to_string(),
                user_data,
                connected_at: Utc::now(),
            },
        );

        let came_online = {
            let mut live = self.user_sockets.entry(user_id.to_string()).or_default();
            live.insert(socket) && live.len() == 1
        };
        self.join(socket, &user_room(user_id));

        info!(came_online, "Socket authenticated");
        Authentication {
            previous,
            came_online,
        }
    }

    /// Drops the identity of a socket, keeping the socket itself open.
    /// The index entry is removed before the connection record.
    fn detach_identity(&self, socket: SocketId) -> Option<Departure> {
        let user_id = self.connections.get(&socket)?.user_id.clone();

        let went_offline = match self.user_sockets.entry(user_id.clone()) {
            Entry::Occupied(mut live) => {
                live.get_mut().remove(&socket);
                if live.get().is_empty() {
                    live.remove();
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(_) => false,
        };
        self.connections.remove(&socket);
        self.leave(socket, &user_room(&user_id));

        Some(Departure {
            user_id,
            went_offline,
        })
    }

    /// Forgets the socket entirely. Returns the identity it carried, if any.
    #[instrument(skip(self))]
    pub fn disconnect(&self, socket: SocketId) -> Option<Departure> {
        let departure = self.detach_identity(socket);

        if let Some((_, handle)) = self.sockets.remove(&socket) {
            for room in &handle.rooms {
                self.remove_member(room, socket);
            }
        }

        info!(
            went_offline = departure.as_ref().is_some_and(|d| d.went_offline),
            remaining = self.sockets.len(),
            "Socket disconnected"
        );
        departure
    }

    pub fn user_of(&self, socket: SocketId) -> Option<String> {
        self.connections.get(&socket).map(|c| c.user_id.clone())
    }

    pub fn connection(&self, socket: SocketId) -> Option<SocketConnection> {
        self.connections.get(&socket).map(|c| c.clone())
    }

    /// Returns `true` if the socket was not in the room yet
    pub fn join(&self, socket: SocketId, room: &str) -> bool {
        let joined = match self.sockets.get_mut(&socket) {
            Some(mut handle) => handle.rooms.insert(room.to_string()),
            None => {
                warn!(socket_id = %socket, room, "Join from unknown socket");
                return false;
            }
        };
        self.rooms.entry(room.to_string()).or_default().insert(socket);
        debug!(socket_id = %socket, room, "Joined room");
        joined
    }

    /// Returns `true` if the socket was in the room
    pub fn leave(&self, socket: SocketId, room: &str) -> bool {
        let left = self
            .sockets
            .get_mut(&socket)
            .is_some_and(|mut handle| handle.rooms.remove(room));
        self.remove_member(room, socket);
        left
    }

    fn remove_member(&self, room: &str, socket: SocketId) {
        if let Entry::Occupied(mut members) = self.rooms.entry(room.to_string()) {
            members.get_mut().remove(&socket);
            if members.get().is_empty() {
                members.remove();
            }
        }
    }

    fn deliver(&self, targets: &[SocketId], frame: Utf8Bytes) -> usize {
        let mut reached = 0;
        for socket in targets {
            let Some(tx) = self.sockets.get(socket).map(|handle| handle.tx.clone()) else {
                continue;
            };
            if tx.send(SocketSignal::Event(frame.clone())).is_ok() {
                reached += 1;
            } else {
                debug!(socket_id = %socket, "Writer already gone, frame dropped");
            }
        }
        reached
    }

    pub fn emit_to(&self, socket: SocketId, event: &ServerEvent) -> bool {
        match encode(event) {
            Some(frame) => self.deliver(&[socket], frame) == 1,
            None => false,
        }
    }

    /// Sends to every member of `room` but `except`; an empty room drops the event
    pub fn emit_room(&self, room: &str, event: &ServerEvent, except: Option<SocketId>) -> usize {
        let targets: Vec<SocketId> = self
            .rooms
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|s| Some(*s) != except)
                    .collect()
            })
            .unwrap_or_default();
        if targets.is_empty() {
            return 0;
        }
        encode(event).map_or(0, |frame| self.deliver(&targets, frame))
    }

    /// Sends to every open socket but `except`
    pub fn emit_all(&self, event: &ServerEvent, except: Option<SocketId>) -> usize {
        let targets: Vec<SocketId> = self
            .sockets
            .iter()
            .map(|entry| *entry.key())
            .filter(|s| Some(*s) != except)
            .collect();
        if targets.is_empty() {
            return 0;
        }
        encode(event).map_or(0, |frame| self.deliver(&targets, frame))
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.user_sockets.contains_key(user_id)
    }

    pub fn sockets_of(&self, user_id: &str) -> usize {
        self.user_sockets.get(user_id).map_or(0, |live| live.len())
    }

    pub fn room_size(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, |members| members.len())
    }

    pub fn connection_count(&self) -> usize {
        self.sockets.len()
    }

    pub fn online_users(&self) -> usize {
        self.user_sockets.len()
    }

    /// Asks every writer task to close its socket
    pub fn close_all(&self) {
        let targets: Vec<UnboundedSender<SocketSignal>> =
            self.sockets.iter().map(|entry| entry.tx.clone()).collect();
        info!(count = targets.len(), "Closing all sockets");
        for tx in targets {
            let _ = tx.send(SocketSignal::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn socket(hub: &Hub) -> (SocketId, UnboundedReceiver<SocketSignal>) {
        let (tx, rx) = unbounded_channel();
        (hub.register(tx), rx)
    }

    fn received(rx: &mut UnboundedReceiver<SocketSignal>) -> Vec<String> {
        let mut events = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            if let SocketSignal::Event(frame) = signal {
                let value: Value = serde_json::from_str(frame.as_str()).unwrap();
                events.push(value["event"].as_str().unwrap().to_string());
            }
        }
        events
    }

    #[test]
    fn test_presence_tracks_every_socket_of_a_user() {
        let hub = Hub::new();
        let (a, _rx_a) = socket(&hub);
        let (b, _rx_b) = socket(&hub);

        assert!(hub.authenticate(a, "7", json!({})).came_online);
        assert!(!hub.authenticate(b, "7", json!({})).came_online);
        assert_eq!(hub.sockets_of("7"), 2);

        let first = hub.disconnect(a).unwrap();
        assert!(!first.went_offline);
        assert!(hub.is_online("7"));

        let last = hub.disconnect(b).unwrap();
        assert!(last.went_offline);
        assert!(!hub.is_online("7"));
        assert_eq!(hub.connection_count(), 0);
        assert_eq!(hub.room_size(&user_room("7")), 0);
    }

    #[test]
    fn test_reauthenticate_same_user_is_idempotent() {
        let hub = Hub::new();
        let (a, _rx) = socket(&hub);
        hub.authenticate(a, "7", json!({}));
        let again = hub.authenticate(a, "7", json!({"name": "Ann"}));
        assert_eq!(again.previous, None);
        assert!(!again.came_online);
        assert_eq!(hub.sockets_of("7"), 1);
        assert_eq!(hub.connection(a).unwrap().user_data["name"], "Ann");
    }

    #[test]
    fn test_reauthenticate_as_other_user_detaches_previous_identity() {
        let hub = Hub::new();
        let (a, _rx) = socket(&hub);
        hub.authenticate(a, "7", json!({}));

        let switched = hub.authenticate(a, "8", json!({}));
        assert_eq!(
            switched.previous,
            Some(Departure {
                user_id: "7".to_string(),
                went_offline: true
            })
        );
        assert!(!hub.is_online("7"));
        assert!(hub.is_online("8"));
        assert_eq!(hub.room_size(&user_room("7")), 0);
        assert_eq!(hub.room_size(&user_room("8")), 1);
    }

    #[test]
    fn test_room_broadcast_reaches_members_only() {
        let hub = Hub::new();
        let (a, mut rx_a) = socket(&hub);
        let (b, mut rx_b) = socket(&hub);
        let (c, mut rx_c) = socket(&hub);
        hub.join(a, &project_room("1"));
        hub.join(b, &project_room("1"));
        hub.join(c, &project_room("2"));

        let event = ServerEvent::new("project_updated", json!({"type": "updated"}));
        assert_eq!(hub.emit_room(&project_room("1"), &event, Some(a)), 1);

        assert!(received(&mut rx_a).is_empty());
        assert_eq!(received(&mut rx_b), ["project_updated"]);
        assert!(received(&mut rx_c).is_empty());
    }

    #[test]
    fn test_leaving_last_member_removes_room() {
        let hub = Hub::new();
        let (a, _rx) = socket(&hub);
        assert!(hub.join(a, "project:5"));
        assert!(!hub.join(a, "project:5"));
        assert_eq!(hub.room_size("project:5"), 1);
        assert!(hub.leave(a, "project:5"));
        assert!(!hub.leave(a, "project:5"));
        assert_eq!(hub.room_size("project:5"), 0);

        let event = ServerEvent::new("user_typing", json!({}));
        assert_eq!(hub.emit_room("project:5", &event, None), 0);
    }

    #[test]
    fn test_emit_all_skips_sender_and_closed_writers() {
        let hub = Hub::new();
        let (a, _rx_a) = socket(&hub);
        let (_b, mut rx_b) = socket(&hub);
        let (_c, rx_c) = socket(&hub);
        drop(rx_c);

        let event = ServerEvent::new("user_presence", json!({"status": "online"}));
        assert_eq!(hub.emit_all(&event, Some(a)), 1);
        assert_eq!(received(&mut rx_b), ["user_presence"]);
    }

    #[test]
    fn test_close_all_signals_every_writer() {
        let hub = Hub::new();
        let (_a, mut rx) = socket(&hub);
        hub.close_all();
        assert!(matches!(rx.try_recv(), Ok(SocketSignal::Shutdown)));
    }
}
