//! One upgraded socket and its two tasks
//!
//! A [`Connection`] registers itself with the hub, then runs a read task and
//! a write task over the two halves of the socket:
//!
//! - the read task forwards every application frame to the hub as a
//!   broadcast and keeps a pong-refreshed read deadline;
//! - the write task drains the outbound queue, sends keepalive pings and
//!   writes the close frame once the hub has closed the queue.
//!
//! The read task is the only one that asks the hub to unregister the
//! connection. Either task closes the socket when it stops, and the other
//! notices through the shared [`Lifecycle`].

mod lifecycle;
mod read;
mod write;

use std::fmt::Display;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, Stream, StreamExt};
use tokio::task::JoinHandle;

pub use lifecycle::{ConnectionState, Lifecycle};

use crate::config::HubConfig;
use crate::error::TransportError;
use crate::hub::{outbound_queue, HubHandle, OutboundReceiver, Registration};
use crate::types::{ConnectionKey, PeerId};

/// A registered connection whose read and write tasks are running
#[derive(Debug)]
pub struct Connection {
    key: ConnectionKey,
    peer: PeerId,
    lifecycle: Lifecycle,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl Connection {
    /// Take over an upgraded websocket
    pub async fn accept(
        socket: WebSocket,
        peer: PeerId,
        hub: HubHandle,
        config: Arc<HubConfig>,
    ) -> Self {
        let (sink, stream) = socket.split();
        Self::spawn(stream, sink, peer, hub, config).await
    }

    /// Register with the hub and start both tasks over a split socket
    pub async fn spawn<S, K, E>(
        stream: S,
        sink: K,
        peer: PeerId,
        hub: HubHandle,
        config: Arc<HubConfig>,
    ) -> Self
    where
        S: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
        E: Display + Send + 'static,
        K: Sink<Message> + Unpin + Send + 'static,
        K::Error: Display + Send,
    {
        let key = ConnectionKey::next();
        let lifecycle = Lifecycle::new();
        let (outbound, queue) = outbound_queue(config.queue_capacity);

        hub.register(Registration::new(key, peer.clone(), outbound, lifecycle.clone()))
            .await;

        let writer = tokio::spawn(run_writer(
            sink,
            queue,
            key,
            peer.clone(),
            lifecycle.clone(),
            Arc::clone(&config),
        ));
        let reader = tokio::spawn(run_reader(
            stream,
            key,
            peer.clone(),
            hub,
            lifecycle.clone(),
            config,
        ));

        Self {
            key,
            peer,
            lifecycle,
            reader,
            writer,
        }
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    pub fn peer(&self) -> &PeerId {
        &self.peer
    }

    pub fn state(&self) -> ConnectionState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Wait for both tasks to exit
    pub async fn join(self) {
        for (task, result) in [("reader", self.reader.await), ("writer", self.writer.await)] {
            if let Err(e) = result {
                tracing::error!(key = %self.key, task, error = %e, "connection task failed");
            }
        }
    }
}

async fn run_reader<S, E>(
    mut stream: S,
    key: ConnectionKey,
    peer: PeerId,
    hub: HubHandle,
    lifecycle: Lifecycle,
    config: Arc<HubConfig>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let reason = read::read_frames(&mut stream, key, &hub, &lifecycle, &config).await;
    log_stop(key, &peer, "read", &reason);

    lifecycle.begin_closing();
    hub.unregister(key).await;
    lifecycle.close_socket();
    drop(stream);
    lifecycle.task_finished();
}

async fn run_writer<K>(
    mut sink: K,
    mut queue: OutboundReceiver,
    key: ConnectionKey,
    peer: PeerId,
    lifecycle: Lifecycle,
    config: Arc<HubConfig>,
) where
    K: Sink<Message> + Unpin,
    K::Error: Display,
{
    match write::write_frames(&mut sink, &mut queue, &lifecycle, &config).await {
        Ok(()) => tracing::debug!(%key, %peer, "write path finished"),
        Err(reason) => log_stop(key, &peer, "write", &reason),
    }

    lifecycle.close_socket();
    write::close_sink(&mut sink, config.write_deadline).await;
    drop(sink);
    lifecycle.task_finished();
}

fn log_stop(key: ConnectionKey, peer: &PeerId, path: &str, reason: &TransportError) {
    match reason {
        TransportError::PeerClosed | TransportError::LocalClose => {
            tracing::debug!(%key, %peer, path, %reason, "connection path stopped")
        }
        _ => tracing::info!(%key, %peer, path, %reason, "connection path stopped"),
    }
}
