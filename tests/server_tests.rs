//! End-to-end tests against a running server over real WebSockets

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use ps_hub::server::{self, ServerHandle};
use ps_hub::{HubConfig, ServerConfig};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> ServerHandle {
    let config = ServerConfig {
        bind_addr: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    server::start(&config, HubConfig::default()).await.unwrap()
}

async fn open(handle: &ServerHandle, user: &str) -> Socket {
    let url = format!("ws://127.0.0.1:{}/ws?user_id={}", handle.port(), user);
    let (socket, _response) = connect_async(url).await.unwrap();
    socket
}

/// Registration happens after the handshake completes, so poll for it
async fn wait_for_active(handle: &ServerHandle, expected: usize) {
    let result = timeout(Duration::from_secs(5), async {
        loop {
            let stats = handle.hub().stats().await.unwrap();
            if stats.active_connections == expected {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "never reached {expected} active connections");
}

async fn next_text(socket: &mut Socket) -> String {
    timeout(Duration::from_secs(5), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return text,
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                other => panic!("expected text frame, got {other:?}"),
            }
        }
    })
    .await
    .expect("timed out waiting for a text frame")
}

/// Read until the server closes the connection
async fn wait_for_close(socket: &mut Socket) {
    let closed = timeout(Duration::from_secs(5), async {
        loop {
            match socket.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "server did not close the connection");
}

#[tokio::test]
async fn test_message_reaches_every_client() {
    let handle = start_server().await;
    let mut alice = open(&handle, "alice").await;
    let mut bob = open(&handle, "bob").await;
    wait_for_active(&handle, 2).await;

    alice.send(Message::Text("hello hub".to_string())).await.unwrap();

    assert_eq!(next_text(&mut bob).await, "hello hub");
    assert_eq!(next_text(&mut alice).await, "hello hub");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_broadcast_reaches_clients() {
    let handle = start_server().await;
    let mut client = open(&handle, "listener").await;
    wait_for_active(&handle, 1).await;

    handle.hub().broadcast("from the server").await;
    assert_eq!(next_text(&mut client).await, "from the server");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_oversized_frame_drops_only_the_sender() {
    let handle = start_server().await;
    let mut offender = open(&handle, "offender").await;
    let mut bystander = open(&handle, "bystander").await;
    wait_for_active(&handle, 2).await;

    offender.send(Message::Text("x".repeat(600))).await.unwrap();
    wait_for_close(&mut offender).await;
    wait_for_active(&handle, 1).await;

    // The bystander is still served
    handle.hub().broadcast("still here").await;
    assert_eq!(next_text(&mut bystander).await, "still here");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_client_close_unregisters() {
    let handle = start_server().await;
    let mut client = open(&handle, "leaver").await;
    wait_for_active(&handle, 1).await;

    client.close(None).await.unwrap();
    wait_for_active(&handle, 0).await;

    let stats = handle.hub().stats().await.unwrap();
    assert_eq!(stats.total_registrations, 1);
    assert_eq!(stats.total_unregistrations, 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_missing_user_id_still_connects() {
    let handle = start_server().await;
    let url = format!("ws://127.0.0.1:{}/ws", handle.port());
    let (_socket, _response) = connect_async(url).await.unwrap();
    wait_for_active(&handle, 1).await;

    handle.shutdown().await.unwrap();
}
