#![allow(dead_code)]

use axum_test::TestServer;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use sitelink::{AppState, Config};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Demo-mode state seeded with the fixtures, broadcasts left at their default
pub fn create_test_state() -> Arc<AppState> {
    Arc::new(AppState::demo(Config::default()))
}

/// Demo-mode state that fans REST mutations out to realtime clients
pub fn create_broadcasting_state() -> Arc<AppState> {
    let config = Config {
        demo_broadcasts: true,
        ..Config::default()
    };
    Arc::new(AppState::demo(config))
}

/// Production-mode state over the pool prepared by `#[sqlx::test]`
pub fn create_production_state(pool: PgPool) -> Arc<AppState> {
    Arc::new(AppState::production(pool, Config::default()))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = sitelink::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Serves the router on an ephemeral port, for clients that need a real socket
pub async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Listener has no address");
    let app = sitelink::create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}

// ============================================================
// realtime clients
// ============================================================

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const WAIT: Duration = Duration::from_secs(2);
pub const QUIET: Duration = Duration::from_millis(300);

pub async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{}/socket", addr))
        .await
        .expect("WebSocket handshake failed");
    client
}

pub async fn send(client: &mut Client, event: &str, data: Value) {
    let frame = json!({ "event": event, "data": data }).to_string();
    client
        .send(Message::Text(frame))
        .await
        .expect("Failed to send frame");
}

/// Next text frame, or None when nothing arrives within `wait`
pub async fn next_frame(client: &mut Client, wait: Duration) -> Option<Value> {
    loop {
        match timeout(wait, client.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                return Some(serde_json::from_str(&text).expect("Frame is not JSON"));
            }
            Ok(Some(Ok(_))) => continue,
            _ => return None,
        }
    }
}

/// Skips frames until `event` arrives
pub async fn expect_event(client: &mut Client, event: &str) -> Value {
    loop {
        let frame = next_frame(client, WAIT)
            .await
            .unwrap_or_else(|| panic!("Timed out waiting for {}", event));
        if frame["event"] == event {
            return frame["data"].clone();
        }
    }
}

/// Every event name received until the socket stays quiet
pub async fn drain(client: &mut Client) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(frame) = next_frame(client, QUIET).await {
        names.push(frame["event"].as_str().unwrap_or_default().to_string());
    }
    names
}

pub async fn authenticate(client: &mut Client, user_id: &str) {
    send(client, "authenticate", json!({ "userId": user_id })).await;
    let data = expect_event(client, "authenticated").await;
    assert_eq!(data["userId"], user_id);
}

pub async fn join(client: &mut Client, project_id: &str) {
    send(client, "join_project", json!({ "projectId": project_id })).await;
    expect_event(client, "joined_project").await;
}
