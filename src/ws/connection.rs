//! WebSocket Connection Management - one reader and one writer task per socket

use super::broadcast::{PresenceStatus, broadcast_presence};
use super::event_handlers::process_frame;
use super::hub::{SocketId, SocketSignal};
use crate::core::AppState;
use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval, timeout};
use tracing::{debug, info, instrument, warn};

pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>) {
    let (ws_tx, ws_rx) = ws.split();

    // The hub keeps one sender for fan-out, the reader keeps one to stop the writer
    let (int_tx, int_rx) = unbounded_channel::<SocketSignal>();
    let socket = state.hub.register(int_tx.clone());
    info!(socket_id = %socket, "WebSocket connection established");

    tokio::spawn(write_ws(
        socket,
        ws_tx,
        int_rx,
        state.config.ws_ping_interval_secs,
    ));
    tokio::spawn(listen_ws(socket, ws_rx, int_tx, state));
}

#[instrument(skip(websocket_tx, internal_rx), fields(socket_id = %socket))]
pub async fn write_ws(
    socket: SocketId,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<SocketSignal>,
    ping_interval_secs: u64,
) {
    debug!("Write task started");

    let mut heartbeat = interval(Duration::from_secs(ping_interval_secs.max(1)));
    heartbeat.tick().await;

    loop {
        tokio::select! {
            signal = internal_rx.recv() => {
                match signal {
                    Some(SocketSignal::Event(frame)) => {
                        if let Err(e) = websocket_tx.send(Message::Text(frame)).await {
                            warn!("Failed to send frame, closing connection: {:?}", e);
                            break;
                        }
                    }
                    Some(SocketSignal::Shutdown) | None => {
                        debug!("Shutdown signal received");
                        let _ = websocket_tx.send(Message::Close(None)).await;
                        break;
                    }
                }
            }

            _ = heartbeat.tick() => {
                if let Err(e) = websocket_tx.send(Message::Ping(Bytes::new())).await {
                    warn!("Failed to send ping, closing connection: {:?}", e);
                    break;
                }
            }
        }
    }

    debug!("Write task terminated");
}

#[instrument(skip(websocket_rx, internal_tx, state), fields(socket_id = %socket))]
pub async fn listen_ws(
    socket: SocketId,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<SocketSignal>,
    state: Arc<AppState>,
) {
    debug!("Listen task started");

    let timeout_secs = state.config.ws_ping_timeout_secs;
    let timeout_duration = Duration::from_secs(timeout_secs.max(1));

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(Ok(msg))) => match msg {
                Message::Text(text) => process_frame(&state, socket, text.as_str()),
                Message::Close(_) => {
                    info!("Close message received");
                    break;
                }
                // Pongs only refresh the timeout
                _ => {}
            },
            Ok(Some(Err(e))) => {
                warn!("WebSocket error: {:?}", e);
                break;
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs, "Connection timeout");
                break;
            }
        }
    }

    let _ = internal_tx.send(SocketSignal::Shutdown);
    if let Some(departure) = state.hub.disconnect(socket).filter(|d| d.went_offline) {
        broadcast_presence(
            &state.hub,
            &departure.user_id,
            PresenceStatus::Offline,
            None,
            None,
        );
    }
    info!("WebSocket connection closed");
}
